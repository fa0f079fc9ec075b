//! Principal-component projection of a genotype-phenotype map.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::check_len;

/// A PCA-reduced genotype-phenotype map.
pub trait PcaModel {
    /// Principal axes, most significant first. Each axis has at least three
    /// loadings.
    fn components(&self) -> &[Vec<f64>];

    /// Genotype coordinates in principal-component space.
    fn projected(&self) -> &[Vec<f64>];

    /// Edges of the genotype graph as pairs of genotype indices.
    fn edges(&self) -> Vec<(usize, usize)>;
}

/// Serde carrier for [`PcaModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaProjection {
    pub components: Vec<Vec<f64>>,
    pub projected: Vec<Vec<f64>>,
    /// Genotype strings; used to derive edges when `edges` is absent.
    #[serde(default)]
    pub genotypes: Vec<String>,
    #[serde(default)]
    pub edges: Option<Vec<(usize, usize)>>,
}

impl PcaProjection {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.projected.is_empty() {
            return Err(ModelError::Empty("projected genotypes"));
        }
        if !self.genotypes.is_empty() {
            check_len("genotypes", self.projected.len(), self.genotypes.len())?;
            if let Some(first) = self.genotypes.first() {
                let width = first.chars().count();
                if let Some(bad) = self.genotypes.iter().find(|g| g.chars().count() != width) {
                    return Err(ModelError::GenotypeLength {
                        genotype: bad.clone(),
                        expected: width,
                    });
                }
            }
        }
        Ok(())
    }
}

impl PcaModel for PcaProjection {
    fn components(&self) -> &[Vec<f64>] {
        &self.components
    }

    fn projected(&self) -> &[Vec<f64>] {
        &self.projected
    }

    fn edges(&self) -> Vec<(usize, usize)> {
        match &self.edges {
            Some(edges) => edges.clone(),
            None => genotype_graph_edges(&self.genotypes),
        }
    }
}

/// Edges between genotypes that differ at exactly one site.
///
/// Genotypes of unequal length are never connected.
pub fn genotype_graph_edges(genotypes: &[String]) -> Vec<(usize, usize)> {
    let chars: Vec<Vec<char>> = genotypes.iter().map(|g| g.chars().collect()).collect();
    let mut edges = Vec::new();
    for i in 0..chars.len() {
        for j in (i + 1)..chars.len() {
            if chars[i].len() != chars[j].len() {
                continue;
            }
            let diff = chars[i]
                .iter()
                .zip(chars[j].iter())
                .filter(|(a, b)| a != b)
                .count();
            if diff == 1 {
                edges.push((i, j));
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genotypes(gs: &[&str]) -> Vec<String> {
        gs.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn hamming_one_edges_of_a_square() {
        let edges = genotype_graph_edges(&genotypes(&["00", "01", "10", "11"]));
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn unequal_lengths_are_not_connected() {
        assert!(genotype_graph_edges(&genotypes(&["0", "01"])).is_empty());
    }

    #[test]
    fn explicit_edges_take_precedence() {
        let pca = PcaProjection {
            components: vec![vec![1.0, 0.0, 0.0]; 3],
            projected: vec![vec![0.0; 3]; 2],
            genotypes: genotypes(&["0", "1"]),
            edges: Some(vec![(1, 0)]),
        };
        assert_eq!(pca.edges(), vec![(1, 0)]);
    }

    #[test]
    fn validate_rejects_ragged_genotypes() {
        let pca = PcaProjection {
            components: vec![],
            projected: vec![vec![0.0; 3]; 2],
            genotypes: genotypes(&["00", "1"]),
            edges: None,
        };
        assert!(matches!(pca.validate(), Err(ModelError::GenotypeLength { expected: 2, .. })));
    }
}
