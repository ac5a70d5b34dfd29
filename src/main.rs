use knowgraph::{props, EngineConfig, GraphEngine, Label, NodeFilter, StorageAdapter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Knowgraph v{}", knowgraph::version());
    println!("==========================================");
    println!();

    // Optional YAML config as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    #[cfg(feature = "rocksdb")]
    let storage = knowgraph::RocksStorage::open(&config.data_path)?;
    #[cfg(not(feature = "rocksdb"))]
    let storage = knowgraph::MemoryStorage::new();

    let mut engine = GraphEngine::with_config(storage, config);
    engine.initialize().await?;

    let stats = engine.get_stats().await?;
    if stats.node_count > 0 {
        println!("Loaded existing graph: {} nodes, {} edges", stats.node_count, stats.edge_count);
        println!("Clearing it for the demo");
        println!();
        engine.clear().await?;
    }

    demo(&mut engine).await?;

    engine.dispose();
    Ok(())
}

async fn demo<S: StorageAdapter>(engine: &mut GraphEngine<S>) -> anyhow::Result<()> {
    println!("=== Building the graph ===");
    let person = || vec![Label::new("Person")];

    let alice = engine.create_node(person(), props([("name", "Alice")])).await?;
    let bob = engine.create_node(person(), props([("name", "Bob")])).await?;
    let carol = engine.create_node(person(), props([("name", "Carol")])).await?;
    let acme = engine
        .create_node(vec![Label::new("Company")], props([("name", "Acme")]))
        .await?;
    println!("✓ Created 3 persons and 1 company");

    engine.create_edge("KNOWS", &alice.id, &bob.id, props([("since", 2020i64)])).await?;
    engine.create_edge("KNOWS", &bob.id, &carol.id, props([("since", 2019i64)])).await?;
    engine.create_edge("WORKS_AT", &carol.id, &acme.id, props([("role", "engineer")])).await?;
    println!("✓ Alice -[KNOWS]-> Bob -[KNOWS]-> Carol -[WORKS_AT]-> Acme");

    println!("\n=== Path finding ===");
    match engine.find_path(&alice.id, &acme.id, 6).await? {
        Some(path) => {
            let names: Vec<&str> = path
                .nodes
                .iter()
                .filter_map(|n| n.get_property("name").and_then(|v| v.as_str()))
                .collect();
            println!("  → {} (length {})", names.join(" -> "), path.length);
        }
        None => println!("  → no path"),
    }
    let reverse = engine.find_path(&acme.id, &alice.id, 6).await?;
    let verdict = if reverse.is_some() {
        "found"
    } else {
        "none (edges are directed)"
    };
    println!("  → Acme to Alice: {}", verdict);

    println!("\n=== Traversal ===");
    let subgraph = engine.traverse(&bob.id, 1).await?;
    println!(
        "  → depth 1 around Bob: {} nodes, {} edges",
        subgraph.nodes.len(),
        subgraph.edges.len()
    );

    println!("\n=== Queries ===");
    let people = engine.query(&NodeFilter::new().with_labels(["Person"])).await?.len();
    println!("  → {} persons", people);
    let named = engine
        .query(&NodeFilter::new().with_properties(props([("name", "Carol")])))
        .await?
        .len();
    println!("  → {} node(s) named Carol", named);

    println!("\n=== Updates ===");
    if let Some(node) = engine.update_node(&bob.id, props([("city", "Berlin")])).await? {
        println!("  → Bob now has {} properties", node.property_count());
    }
    engine.delete_node(&bob.id).await?;
    println!("  → Deleted Bob and his edges");

    let stats = engine.get_stats().await?;
    println!("\nGraph Statistics:");
    println!("  Total nodes: {}", stats.node_count);
    println!("  Total edges: {}", stats.edge_count);
    println!("  Labels: {:?}", stats.labels);
    println!("  Edge types: {:?}", stats.edge_types);

    Ok(())
}
