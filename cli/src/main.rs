use sherwood::{BytesContext, DuplicatePolicy, StaticMapBuilder};
use std::io::Read;

fn main() {
    // Read key=value lines from the file argument, or stdin without one
    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).expect("readable input file"),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .expect("readable stdin");
            buffer
        }
    };

    // One pair per line; blank lines and #-comments are skipped, and a
    // line without '=' becomes a key with an empty value
    let pairs: Vec<(String, String)> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.split_once('=') {
            Some((key, value)) => (key.trim().to_owned(), value.trim().to_owned()),
            None => (line.to_owned(), String::new()),
        })
        .collect();

    // STRICT rejects duplicate keys instead of keeping the last one
    let mut builder = StaticMapBuilder::with_context(BytesContext);
    if std::env::var("STRICT").is_ok() {
        builder.duplicate_policy(DuplicatePolicy::Reject);
    }
    let table = match builder.build(pairs) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    };

    // Layout report
    println!("entries      {}", table.len());
    println!("capacity     {}", table.capacity());
    println!(
        "load factor  {:.1}%",
        table.len() as f64 * 100.0 / table.capacity() as f64
    );
    println!("max probe    {}", table.max_probe_distance());
    println!("probe histogram");
    for (distance, count) in table.probe_histogram().iter().enumerate() {
        println!("  {:>3}  {}", distance, count);
    }
}
