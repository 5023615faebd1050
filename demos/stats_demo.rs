use clap::Parser;
use lintab::DefaultHashBuilder;
use lintab::Table;
use lintab::UNDEFINED;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Parser, Debug)]
struct Args {
    /// Number of distinct random words to insert.
    #[arg(short = 'k', long = "keys", default_value_t = 100_000)]
    keys: usize,

    /// Fraction of the inserted words to remove afterwards, leaving tombstones.
    #[arg(short = 'r', long = "remove_fraction", default_value_t = 0.25)]
    remove_fraction: f64,

    /// Seed for the word generator.
    #[arg(short = 's', long = "seed", default_value_t = 0x5eed)]
    seed: u64,
}

fn random_words(count: usize, seed: u64) -> Vec<String> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let len = rng.random_range(7..16);
            let word: String = (0..len)
                .map(|_| rng.random_range(b'a'..=b'z') as char)
                .collect();
            format!("{word}{i}")
        })
        .collect()
}

fn main() {
    let args = Args::parse();

    println!("Generating {} random words...", args.keys);
    let words = random_words(args.keys, args.seed);

    let mut table: Table<'_, DefaultHashBuilder> = Table::new();
    println!("Initial capacity: {}", table.capacity());

    for (i, word) in words.iter().enumerate() {
        table.insert(word, i as u64 + 1);
    }
    println!(
        "Inserted {} words, capacity {} ({:.2}% load factor)",
        table.len(),
        table.capacity(),
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    table.probe_histogram().print();

    let removals = (args.keys as f64 * args.remove_fraction.clamp(0.0, 1.0)) as usize;
    for word in &words[..removals] {
        table.remove(word);
    }
    println!("Removed {} words", removals);

    let misses = words
        .iter()
        .enumerate()
        .filter(|(i, word)| {
            let expected = if *i < removals { UNDEFINED } else { *i as u64 + 1 };
            table.get(*word) != expected
        })
        .count();
    println!("Mismatched lookups: {}", misses);

    table.debug_stats().print();
}
