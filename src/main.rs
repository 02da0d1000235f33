use ring_traffic::{reference_flow, run, Config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // An optional JSON config file overrides the defaults field by field.
    let config: Config = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    let output = run(&config)?;

    let count = output.samples.len().max(1) as f64;
    let density = output.samples.iter().map(|s| s.density).sum::<f64>() / count;
    let flow = output.samples.iter().map(|s| s.flow).sum::<f64>() / count;
    eprintln!(
        "{} ticks, {} samples: mean density {:.3}, mean flow {:.3} (reference {:.3})",
        output.history.len(),
        output.samples.len(),
        density,
        flow,
        reference_flow(density),
    );

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}
