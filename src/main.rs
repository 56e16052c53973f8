use abc_triples::search::{run_parallel, EnumerateConfig, RunSummary};
use abc_triples::sink::CsvSink;

fn main() {
    let mut cfg = EnumerateConfig::default();
    let mut out_path: Option<String> = None;
    let mut validate_only = false;

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.limit = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                i += 2;
            }
            "--out" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                out_path = Some(v.clone());
                i += 2;
            }
            "--workers" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.workers = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                i += 2;
            }
            "--threshold" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.quality_threshold = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                i += 2;
            }
            "--report-every" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.report_every = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                i += 2;
            }
            "--validate" | "--test" => {
                validate_only = true;
                i += 1;
            }
            "--help" | "-h" => usage_and_exit(0),
            _ => usage_and_exit(2),
        }
    }

    if validate_only {
        match abc_triples::validate::validate_known_triples() {
            Ok(()) => {
                println!("Validation OK: bundled known triples are reproduced correctly.");
                return;
            }
            Err(e) => {
                eprintln!("Validation FAILED: {e}");
                std::process::exit(1);
            }
        }
    }

    let path = out_path.unwrap_or_else(|| format!("abc_triples_c{}.csv", cfg.limit));
    println!("--------------------------------------------------");
    println!(
        "abc search: c <= {} | workers: {} | hits at q > {:.2}",
        cfg.limit, cfg.workers, cfg.quality_threshold
    );
    println!("Writing records to {path}");
    println!("--------------------------------------------------");

    let mut sink = match CsvSink::create(&path) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("Cannot open output: {e}");
            std::process::exit(1);
        }
    };

    match run_parallel(&cfg, &mut sink) {
        Ok(summary) => {
            println!();
            print_summary(&summary, &cfg, &path);
        }
        Err(e) => {
            eprintln!("\nEnumeration aborted: {e}");
            std::process::exit(1);
        }
    }
}

fn print_summary(summary: &RunSummary, cfg: &EnumerateConfig, path: &str) {
    println!("Done: {} triples written to {path}.", summary.emitted);
    println!(
        "Notable hits (q > {:.2}): {}",
        cfg.quality_threshold,
        summary.notable_hits.len()
    );
    for hit in &summary.notable_hits {
        let t = hit.triple;
        let m = hit.metrics;
        println!(
            "  a={} b={} c={}  q={:.4}  rho={}",
            t.a, t.b, t.c, m.quality, m.ramification_depth
        );
    }
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  abc [--limit N] [--out PATH] [--workers N] [--threshold Q] [--report-every N]\n  abc --validate\n\nOptions:\n  --limit N          Maximum value of c to consider (default: 20000)\n  --out PATH         Output CSV path (default: abc_triples_c<limit>.csv)\n  --workers N        Worker threads for the sharded runner (default: 1)\n  --threshold Q      Quality threshold for the notable-hits summary (default: 1.4)\n  --report-every N   Progress report period in records, 0 disables (default: 500000)\n  --validate/--test  Validate bundled known triples (fast, deterministic)\n"
    );
    std::process::exit(code)
}
