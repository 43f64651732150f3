//! Random-walk co-occurrence embeddings (node2vec-style).
//!
//! Samples a fixed number of fixed-length uniform random walks from every
//! node, treats walks as token sequences, and fits skip-gram vectors with
//! negative sampling so nodes that co-occur in walks end up close in vector
//! space. Walk generation is the only parallel stage (fixed-size rayon pool).
//!
//! The RNG is unseeded, so vectors differ across runs.

use super::graph::ExportedGraph;
use super::NodeEmbeddings;
use crate::EmbeddingConfig;
use anyhow::Result;
use candle_core::{DType, Device, Tensor, D};
use candle_nn::ops::sigmoid;
use candle_nn::{embedding, Embedding, Module, Optimizer, VarBuilder, VarMap, SGD};
use rand::prelude::*;
use rayon::prelude::*;

const BATCH: usize = 512;

/// Train skip-gram embeddings over random walks.
///
/// Returns one `cfg.dim`-length vector per node in the graph.
pub fn train(graph: &ExportedGraph, cfg: &EmbeddingConfig) -> Result<NodeEmbeddings> {
    let n = graph.node_count();
    let mut result = NodeEmbeddings::new();
    if n == 0 {
        return Ok(result);
    }

    let adjacency = graph.out_adjacency();
    let walks = generate_walks(&adjacency, cfg)?;
    let mut pairs = cooccurrence_pairs(&walks, cfg.window);
    tracing::debug!(walks = walks.len(), pairs = pairs.len(), "walk generation done");

    let device = Device::Cpu;
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
    let center = embedding(n, cfg.dim, vb.pp("center"))?;
    let context = embedding(n, cfg.dim, vb.pp("context"))?;

    // A graph whose walks produce no pairs (e.g. all nodes are sinks) keeps
    // its random initialization; every node still gets a vector.
    if !pairs.is_empty() {
        let mut opt = SGD::new(varmap.all_vars(), cfg.walk_lr)?;
        let mut rng = rand::rng();
        for _ in 0..cfg.walk_epochs {
            pairs.shuffle(&mut rng);
            for batch in pairs.chunks(BATCH) {
                let loss = batch_loss(&center, &context, batch, n, cfg, &mut rng, &device)?;
                opt.backward_step(&loss)?;
            }
        }
    }

    let weights = center.embeddings().to_vec2::<f32>()?;
    for (id, idx) in &graph.id_to_index {
        result.insert(id.clone(), weights[idx.index()].clone());
    }
    Ok(result)
}

/// Generate `walks_per_node` walks from every node on a pool of
/// `cfg.workers` threads.
fn generate_walks(adjacency: &[Vec<u32>], cfg: &EmbeddingConfig) -> Result<Vec<Vec<u32>>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.workers.max(1))
        .build()?;

    let walks_per_node = cfg.walks_per_node;
    let walk_length = cfg.walk_length;

    Ok(pool.install(|| {
        (0..adjacency.len() as u32)
            .into_par_iter()
            .flat_map_iter(|start| {
                let mut rng = rand::rng();
                (0..walks_per_node)
                    .map(|_| random_walk(adjacency, start, walk_length, &mut rng))
                    .collect::<Vec<_>>()
                    .into_iter()
            })
            .collect()
    }))
}

/// One uniform random walk over out-edges; ends early at a sink.
fn random_walk(
    adjacency: &[Vec<u32>],
    start: u32,
    length: usize,
    rng: &mut impl Rng,
) -> Vec<u32> {
    let mut walk = Vec::with_capacity(length);
    walk.push(start);
    let mut current = start;
    for _ in 1..length {
        let neighbors = &adjacency[current as usize];
        if neighbors.is_empty() {
            break;
        }
        current = neighbors[rng.random_range(0..neighbors.len())];
        walk.push(current);
    }
    walk
}

/// Skip-gram (center, context) pairs within `window` of each other.
fn cooccurrence_pairs(walks: &[Vec<u32>], window: usize) -> Vec<(u32, u32)> {
    let mut pairs = Vec::new();
    for walk in walks {
        for (i, &center) in walk.iter().enumerate() {
            let lo = i.saturating_sub(window);
            let hi = (i + window + 1).min(walk.len());
            for j in lo..hi {
                if j != i {
                    pairs.push((center, walk[j]));
                }
            }
        }
    }
    pairs
}

/// Negative-sampling loss for one batch of pairs.
fn batch_loss(
    center: &Embedding,
    context: &Embedding,
    batch: &[(u32, u32)],
    n: usize,
    cfg: &EmbeddingConfig,
    rng: &mut impl Rng,
    device: &Device,
) -> Result<Tensor> {
    let b = batch.len();
    let centers: Vec<u32> = batch.iter().map(|p| p.0).collect();
    let contexts: Vec<u32> = batch.iter().map(|p| p.1).collect();
    let negatives: Vec<u32> = (0..b * cfg.negatives)
        .map(|_| rng.random_range(0..n as u32))
        .collect();

    let centers = Tensor::from_vec(centers, (b,), device)?;
    let contexts = Tensor::from_vec(contexts, (b,), device)?;
    let negatives = Tensor::from_vec(negatives, (b, cfg.negatives), device)?;

    let u = center.forward(&centers)?; // (b, dim)
    let v = context.forward(&contexts)?; // (b, dim)
    let vn = context.forward(&negatives)?; // (b, negatives, dim)

    // -log σ(u·v) for the observed pair
    let pos = u.mul(&v)?.sum(D::Minus1)?;
    let pos_loss = sigmoid(&pos)?.clamp(1e-7, 1.0)?.log()?.neg()?;

    // -Σ log σ(-u·v_neg) for the sampled negatives
    let neg_scores = vn.broadcast_mul(&u.unsqueeze(1)?)?.sum(D::Minus1)?;
    let neg_loss = sigmoid(&neg_scores.neg()?)?
        .clamp(1e-7, 1.0)?
        .log()?
        .neg()?
        .sum(D::Minus1)?;

    Ok((pos_loss + neg_loss)?.mean_all()?)
}
