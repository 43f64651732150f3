//! GraphSAGE-style message-passing encoder.
//!
//! One-hot node features through two mean-aggregation layers (hidden ReLU,
//! linear output), trained against `mean((E*E^T - I)^2)`, an unsupervised
//! objective pulling distinct nodes toward orthogonality.
//!
//! The feature width equals the node count and the loss matrix is n x n, so
//! this strategy is not intended past graphs of a few thousand nodes.

use super::graph::ExportedGraph;
use super::NodeEmbeddings;
use crate::EmbeddingConfig;
use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::{linear, AdamW, Linear, Module, Optimizer, ParamsAdamW, VarBuilder, VarMap};

/// One mean-aggregation layer: `W_self·x + W_neigh·mean(in-neighbors of x)`.
struct SageLayer {
    lin_self: Linear,
    lin_neigh: Linear,
}

impl SageLayer {
    fn new(in_dim: usize, out_dim: usize, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            lin_self: linear(in_dim, out_dim, vb.pp("self"))?,
            lin_neigh: linear(in_dim, out_dim, vb.pp("neigh"))?,
        })
    }

    fn forward(&self, x: &Tensor, adj: &Tensor) -> Result<Tensor> {
        let aggregated = adj.matmul(x)?;
        Ok((self.lin_self.forward(x)? + self.lin_neigh.forward(&aggregated)?)?)
    }
}

/// Train the two-layer encoder.
///
/// Returns one `cfg.dim`-length vector per node in the graph.
pub fn train(graph: &ExportedGraph, cfg: &EmbeddingConfig) -> Result<NodeEmbeddings> {
    let n = graph.node_count();
    let mut result = NodeEmbeddings::new();
    if n == 0 {
        return Ok(result);
    }

    let device = Device::Cpu;
    let adj = mean_in_adjacency(graph, &device)?;
    let x = Tensor::eye(n, DType::F32, &device)?;
    let target = x.clone();

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
    let conv1 = SageLayer::new(n, cfg.sage_hidden, vb.pp("conv1"))?;
    let conv2 = SageLayer::new(cfg.sage_hidden, cfg.dim, vb.pp("conv2"))?;

    let mut opt = AdamW::new(
        varmap.all_vars(),
        ParamsAdamW {
            lr: cfg.sage_lr,
            ..Default::default()
        },
    )?;

    for epoch in 0..cfg.sage_epochs {
        let out = conv2.forward(&conv1.forward(&x, &adj)?.relu()?, &adj)?;
        let gram = out.matmul(&out.t()?)?;
        let loss = gram.sub(&target)?.sqr()?.mean_all()?;
        opt.backward_step(&loss)?;

        if epoch % 10 == 0 {
            tracing::debug!(epoch, loss = loss.to_scalar::<f32>()?, "sage training");
        }
    }

    let out = conv2.forward(&conv1.forward(&x, &adj)?.relu()?, &adj)?;
    let rows = out.to_vec2::<f32>()?;
    for (id, idx) in &graph.id_to_index {
        result.insert(id.clone(), rows[idx.index()].clone());
    }
    Ok(result)
}

/// Row-normalized in-adjacency: row i averages the one-hot features of i's
/// in-neighbors (zero row for nodes with no incoming edges).
fn mean_in_adjacency(graph: &ExportedGraph, device: &Device) -> Result<Tensor> {
    let n = graph.node_count();
    let incoming = graph.in_adjacency();

    let mut data = vec![0f32; n * n];
    for (i, neighbors) in incoming.iter().enumerate() {
        if neighbors.is_empty() {
            continue;
        }
        let weight = 1.0 / neighbors.len() as f32;
        for &j in neighbors {
            data[i * n + j as usize] = weight;
        }
    }

    Ok(Tensor::from_vec(data, (n, n), device)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_config() -> EmbeddingConfig {
        EmbeddingConfig {
            dim: 4,
            sage_hidden: 4,
            sage_epochs: 2,
            ..Default::default()
        }
    }

    fn path_graph() -> ExportedGraph {
        let mut g = ExportedGraph::new();
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        g.add_edge("a", "c");
        g
    }

    #[test]
    fn test_mean_in_adjacency_rows() {
        let graph = path_graph();
        let adj = mean_in_adjacency(&graph, &Device::Cpu).unwrap();
        let rows = adj.to_vec2::<f32>().unwrap();

        let a = graph.id_to_index["a"].index();
        let c = graph.id_to_index["c"].index();

        // "a" has no in-edges: zero row
        assert!(rows[a].iter().all(|&w| w == 0.0));
        // "c" has two in-neighbors, each weighted 1/2
        let row_sum: f32 = rows[c].iter().sum();
        assert!((row_sum - 1.0).abs() < 1e-6);
        assert_eq!(rows[c].iter().filter(|&&w| w > 0.0).count(), 2);
    }

    #[test]
    fn test_train_emits_one_vector_per_node() {
        let graph = path_graph();
        let embeddings = train(&graph, &tiny_config()).unwrap();
        assert_eq!(embeddings.len(), 3);
        for vector in embeddings.values() {
            assert_eq!(vector.len(), 4);
        }
    }

    #[test]
    fn test_train_empty_graph_is_empty() {
        let graph = ExportedGraph::new();
        let embeddings = train(&graph, &tiny_config()).unwrap();
        assert!(embeddings.is_empty());
    }
}
