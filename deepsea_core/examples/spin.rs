use deepsea_core::{format_korean_currency, spin_with_seed, EngineConfig, Symbol};

fn main() {
    // Example end-to-end spin
    let seed = 1u64;
    let config = EngineConfig::new(100.0, 5.0);
    let outcome = spin_with_seed(&config, 100.0, seed);
    for row in outcome.grid.rows() {
        let labels: Vec<&str> = row.iter().map(|s: &Symbol| s.label()).collect();
        println!("{}", labels.join(" | "));
    }
    for win in &outcome.win_lines {
        println!(
            "line {:>2}: {:?} x{} -> {}",
            win.line, win.symbol, win.count, win.amount
        );
    }
    println!(
        "seed={} total_win={} event={:?}",
        seed,
        format_korean_currency(outcome.total_win),
        outcome.special_event
    );
}
