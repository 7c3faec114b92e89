use std::error::Error;

use clique_separators::{
    Decomposition,
    graph::generic::{Adj, ImplGraph},
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clique_separators=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let n = 12;
    let p = 0.25;
    let seed = 7;

    let rng = &mut Pcg64::seed_from_u64(seed);
    let mut graph = Adj::default();
    for node in 0..n {
        graph.add_labelled_node(node);
    }
    for a in 0..n {
        for b in a + 1..n {
            if rng.gen_bool(p) {
                graph.add_labelled_edge((a, b));
            }
        }
    }
    tracing::info!(nodes = graph.len(), edges = graph.edge_count(), seed, "random graph");

    let decomposition = Decomposition::new(&graph)?;
    println!("{}", serde_json::to_string_pretty(&decomposition.report())?);
    Ok(())
}
