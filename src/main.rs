//! Benchmark driver for the three multipliers.
//!
//! Sweeps matrix sizes 2^0 .. 2^power for a number of passes, fills the
//! operands with random digits, times each selected algorithm, samples
//! resident memory, and writes the records to a JSON, CSV or text report
//! under `results/`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::Rng;
use serde::Serialize;

use strassen::{blocked_multiply, direct_multiply, recursive_multiply};

const OUT_FOLDER: &str = "results";

#[derive(Parser, Debug)]
#[command(version, about = "Benchmark direct, blocked and Strassen matrix multiplication")]
struct Args {
    /// Repetitions of the full size sweep
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    passes: u32,

    /// Largest exponent: sizes run from 2^0 up to 2^power
    #[arg(short = 'w', long, value_parser = clap::value_parser!(u32).range(1..=30))]
    power: u32,

    /// Strassen recursion cutoff; 0 recurses all the way to 1x1
    #[arg(short, long, default_value_t = 0)]
    threshold: usize,

    /// Tile size for the blocked algorithm; selects the blocked run
    #[arg(short, long)]
    blocksize: Option<usize>,

    /// Run the standard (direct) algorithm
    #[arg(short = 'n', long)]
    standard: bool,

    /// Run Strassen's algorithm
    #[arg(short, long)]
    strassen: bool,

    /// Worker threads for every algorithm
    #[arg(short = 'T', long, default_value_t = 1)]
    threadcount: usize,

    /// Skip the timed second run of each algorithm
    #[arg(short = '1', long)]
    time_disable: bool,

    /// Skip resident-set-size sampling
    #[arg(short = '2', long)]
    memory_disable: bool,

    /// Compare each output against the direct result
    #[arg(short = '3', long)]
    check_correctness: bool,

    /// Print the run configuration before starting
    #[arg(short, long)]
    verbose: bool,

    /// Report file name; format taken from the extension (json, csv or txt)
    #[arg(short, long, default_value = "results.json")]
    output: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Csv,
    Txt,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
            Format::Txt => "txt",
        }
    }
}

#[derive(Serialize)]
struct Sample {
    time_s: f64,
    #[serde(rename = "rss_kB")]
    rss_kb: i64,
}

#[derive(Serialize)]
struct Record {
    pass: u32,
    n: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    standard: Option<Sample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocked: Option<Sample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strassen: Option<Sample>,
    equivalent: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    results: &'a [Record],
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.threadcount < 1 {
        bail!("thread count must be at least 1");
    }
    if args.blocksize == Some(0) {
        bail!("block size must be at least 1");
    }
    let (base, format) = parse_output_name(&args.output)?;

    println!("Starting matrix multiplication benchmark...");
    if args.verbose {
        print_config(&args);
    }

    fs::create_dir_all(OUT_FOLDER).with_context(|| format!("creating {OUT_FOLDER}/"))?;
    let path = unique_path(Path::new(OUT_FOLDER), &base, format.extension());
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    let records = run_sweep(&args)?;
    write_report(&mut out, format, &records)?;
    out.flush().with_context(|| format!("writing {}", path.display()))?;
    println!("Results written to {}", path.display());
    Ok(())
}

fn print_config(args: &Args) {
    println!("=========================================");
    println!("PASSES: {}", args.passes);
    println!("POWER: {}", args.power);
    println!("THRESHOLD: {}", args.threshold);
    println!("BLOCKSIZE: {}", args.blocksize.unwrap_or(0));
    println!("STANDARD: {}", args.standard);
    println!("STRASSEN: {}", args.strassen);
    println!("THREADCOUNT: {}", args.threadcount);
    println!("TIME_DISABLE: {}", args.time_disable);
    println!("MEMORY_DISABLE: {}", args.memory_disable);
    println!("CHECK_CORRECTNESS: {}", args.check_correctness);
    println!("=========================================");
}

/// Split the report name into base and format; a name without an extension
/// defaults to JSON.
fn parse_output_name(output: &str) -> Result<(String, Format)> {
    let (base, ext) = match output.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => (base.to_string(), ext),
        _ => (output.to_string(), "json"),
    };
    let format = match ext {
        "json" => Format::Json,
        "csv" => Format::Csv,
        "txt" => Format::Txt,
        other => bail!("output format must be json, csv or txt (got .{other})"),
    };
    Ok((base, format))
}

/// First free name in `dir`: `base.ext`, then `base_1.ext`, `base_2.ext`, ...
fn unique_path(dir: &Path, base: &str, ext: &str) -> PathBuf {
    let mut path = dir.join(format!("{base}.{ext}"));
    let mut count = 1;
    while path.exists() {
        path = dir.join(format!("{base}_{count}.{ext}"));
        count += 1;
    }
    path
}

fn run_sweep(args: &Args) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for pass in 0..=args.passes {
        println!("Pass: {}/{}", pass, args.passes);
        for j in 0..=args.power {
            records.push(bench_size(args, pass, j)?);
        }
    }
    Ok(records)
}

/// Run every selected algorithm at `n = 2^j`, once warm and once timed.
fn bench_size(args: &Args, pass: u32, j: u32) -> Result<Record> {
    let n = 1usize << j;
    println!("Testing matrix size: {} (2^{})...", n, j);

    let mut rng = rand::rng();
    let a = random_digits(&mut rng, n);
    let b = random_digits(&mut rng, n);

    let mut c_std = vec![0i64; n * n];
    let mut c_blk = vec![0i64; n * n];
    let mut c_str = vec![0i64; n * n];

    let mut record = Record {
        pass,
        n,
        standard: None,
        blocked: None,
        strassen: None,
        equivalent: true,
    };
    let threads = args.threadcount;

    if args.standard {
        direct_multiply(&a, &b, &mut c_std, n, threads)?;
        let mut time_s = 0.0;
        if !args.time_disable {
            let start = Instant::now();
            direct_multiply(&a, &b, &mut c_std, n, threads)?;
            time_s = start.elapsed().as_secs_f64();
        }
        record.standard = Some(Sample { time_s, rss_kb: sample_rss(args) });
    }

    if let Some(block_size) = args.blocksize {
        blocked_multiply(&a, &b, &mut c_blk, n, block_size, threads)?;
        let mut time_s = 0.0;
        if !args.time_disable {
            // The blocked algorithm accumulates, so the timed run needs a
            // zeroed output again.
            c_blk.fill(0);
            let start = Instant::now();
            blocked_multiply(&a, &b, &mut c_blk, n, block_size, threads)?;
            time_s = start.elapsed().as_secs_f64();
        }
        record.blocked = Some(Sample { time_s, rss_kb: sample_rss(args) });
    }

    if args.strassen {
        recursive_multiply(&a, &b, &mut c_str, n, args.threshold, threads)?;
        let mut time_s = 0.0;
        if !args.time_disable {
            let start = Instant::now();
            recursive_multiply(&a, &b, &mut c_str, n, args.threshold, threads)?;
            time_s = start.elapsed().as_secs_f64();
        }
        record.strassen = Some(Sample { time_s, rss_kb: sample_rss(args) });
    }

    if args.check_correctness {
        if !args.standard {
            // The comparison baseline is always the direct product.
            direct_multiply(&a, &b, &mut c_std, n, threads)?;
        }
        record.equivalent = if args.strassen {
            c_std == c_str
        } else if args.blocksize.is_some() {
            c_std == c_blk
        } else {
            true
        };
    }

    Ok(record)
}

fn random_digits(rng: &mut impl Rng, n: usize) -> Vec<i64> {
    (0..n * n).map(|_| rng.random_range(0..10)).collect()
}

fn sample_rss(args: &Args) -> i64 {
    if args.memory_disable { 0 } else { current_rss_kb() }
}

/// Resident set size in kB, read from `/proc/self/status`.
#[cfg(target_os = "linux")]
fn current_rss_kb() -> i64 {
    let Ok(status) = fs::read_to_string("/proc/self/status") else {
        return 0;
    };
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            if let Some(kb) = rest.split_whitespace().next() {
                return kb.parse().unwrap_or(0);
            }
        }
    }
    0
}

#[cfg(not(target_os = "linux"))]
fn current_rss_kb() -> i64 {
    0
}

fn write_report(out: &mut impl Write, format: Format, records: &[Record]) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &Report { results: records })?;
            writeln!(out)?;
        }
        Format::Csv => {
            writeln!(out, "algorithm,n,time_s,rss_kB,equivalent")?;
            for record in records {
                let eq = i32::from(record.equivalent);
                for (name, sample) in named_samples(record) {
                    writeln!(
                        out,
                        "{},{},{:.9},{},{}",
                        name, record.n, sample.time_s, sample.rss_kb, eq
                    )?;
                }
            }
        }
        Format::Txt => {
            for record in records {
                let eq = i32::from(record.equivalent);
                for (name, sample) in named_samples(record) {
                    writeln!(
                        out,
                        "{}: n={} time={:.9}s rss={}kB eq={}",
                        name, record.n, sample.time_s, sample.rss_kb, eq
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn named_samples(record: &Record) -> impl Iterator<Item = (&'static str, &Sample)> {
    [
        ("standard", record.standard.as_ref()),
        ("blocked", record.blocked.as_ref()),
        ("strassen", record.strassen.as_ref()),
    ]
    .into_iter()
    .filter_map(|(name, sample)| sample.map(|s| (name, s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_defaults_to_json() {
        let (base, format) = parse_output_name("run").unwrap();
        assert_eq!(base, "run");
        assert_eq!(format, Format::Json);
    }

    #[test]
    fn output_name_splits_extension() {
        let (base, format) = parse_output_name("sweep.csv").unwrap();
        assert_eq!(base, "sweep");
        assert_eq!(format, Format::Csv);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(parse_output_name("results.xml").is_err());
    }

    #[test]
    fn csv_report_lists_one_line_per_algorithm() {
        let records = [Record {
            pass: 0,
            n: 4,
            standard: Some(Sample { time_s: 0.5, rss_kb: 128 }),
            blocked: None,
            strassen: Some(Sample { time_s: 0.25, rss_kb: 256 }),
            equivalent: true,
        }];
        let mut buf = Vec::new();
        write_report(&mut buf, Format::Csv, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "algorithm,n,time_s,rss_kB,equivalent\n\
             standard,4,0.500000000,128,1\n\
             strassen,4,0.250000000,256,1\n"
        );
    }

    #[test]
    fn json_report_skips_algorithms_that_did_not_run() {
        let records = [Record {
            pass: 1,
            n: 2,
            standard: None,
            blocked: Some(Sample { time_s: 0.0, rss_kb: 0 }),
            strassen: None,
            equivalent: false,
        }];
        let mut buf = Vec::new();
        write_report(&mut buf, Format::Json, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"blocked\""));
        assert!(!text.contains("\"standard\""));
        assert!(text.contains("\"equivalent\": false"));
    }
}
