//! A thin `clap`-driven consumer of `dnscore`'s public API: a `dnsq`-like
//! lookup tool and a `zonecheck`-like load validator, standing in for the
//! out-of-scope query tool and signer (see `dnscore`'s crate doc comment).
//!
//! Grounded on the teacher's `bin-dnsq`/`bin-ztoz` binaries: same
//! `#[derive(Parser)]` + doc-comment-as-help-text style, same
//! `tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())`
//! logging setup (`bin-resolved/src/main.rs`'s `begin_logging`), only without
//! the async runtime this crate has no I/O to justify.

mod zonefile;

use clap::{Parser, Subcommand};
use dnscore::name::Name;
use dnscore::rdata::{RData, RecordType};
use dnscore::zonedb::{LookupOutcome, ZoneFindOptions};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Zone database engine and DNS wire/rdata codec: demonstration CLI.
#[derive(Parser)]
#[command(name = "dnscore-cli")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a zone file and answer one query against it, `dig`/`dnsq`-style.
    Query {
        /// Path to the zone file to load.
        #[arg(short, long)]
        zone_file: PathBuf,

        /// The zone's apex/origin name (defaults to the zone file's own
        /// `$ORIGIN`/first SOA owner if omitted).
        #[arg(short, long)]
        origin: Option<String>,

        /// Domain name to look up.
        name: String,

        /// Record type to look up.
        #[arg(default_value = "A")]
        qtype: String,
    },
    /// Load a zone file and report whether it parses, `named-checkzone`/
    /// `bin-ztoz`-style, printing every loaded rdataset in text form.
    Check {
        /// Path to the zone file to load.
        #[arg(short, long)]
        zone_file: PathBuf,

        /// The zone's apex/origin name.
        #[arg(short, long)]
        origin: String,
    },
}

fn begin_logging() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_ansi(true).init();
}

fn main() {
    begin_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Query { zone_file, origin, name, qtype } => run_query(&zone_file, origin.as_deref(), &name, &qtype),
        Command::Check { zone_file, origin } => run_check(&zone_file, &origin),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run_query(zone_file: &PathBuf, origin: Option<&str>, qname: &str, qtype: &str) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(zone_file)?;
    let origin_name = match origin {
        Some(o) => Name::from_text(o, None)?,
        None => Name::from_text(sniff_origin(&text)?, None)?,
    };
    let db = zonefile::load_zone(&origin_name, &text)?;

    let qname = Name::from_text(qname, Some(&origin_name))?;
    let qtype = RecordType::from_mnemonic(qtype).ok_or_else(|| format!("unknown query type {qtype}"))?;

    println!(";; QUESTION");
    println!("{}\tIN\t{}", qname.to_text(None), qtype);

    match db.zone_find(&qname, qtype, None, ZoneFindOptions::default()) {
        LookupOutcome::Success { rtype, slab, ttl } => print_section("ANSWER", &qname, rtype, &slab, ttl),
        LookupOutcome::WildcardSuccess { synthesized_owner, rtype, slab, ttl } => {
            print_section("ANSWER", &synthesized_owner, rtype, &slab, ttl);
        }
        LookupOutcome::Cname { target, ttl } => {
            println!("\n;; ANSWER");
            println!("{}\t{}\tIN\tCNAME\t{}", qname.to_text(None), ttl, target.to_text(None));
        }
        LookupOutcome::Dname { target, ttl } => {
            println!("\n;; ANSWER");
            println!("{}\t{}\tIN\tDNAME\t{}", qname.to_text(None), ttl, target.to_text(None));
        }
        LookupOutcome::Delegation { zonecut, ns, ttl } => print_section("AUTHORITY (delegation)", &zonecut, RecordType::Ns, &ns, ttl),
        LookupOutcome::Glue { zonecut, rtype, slab, ttl } => {
            println!(";; glue beneath zonecut {}", zonecut.to_text(None));
            print_section("ANSWER", &qname, rtype, &slab, ttl);
        }
        LookupOutcome::Nxdomain { denial } => {
            println!("\n;; ANSWER\n; name does not exist");
            if let Some(denial) = denial {
                println!(";; denial proved by NXT at {}", denial.owner.to_text(None));
            }
        }
        LookupOutcome::Nxrrset { denial } => {
            println!("\n;; ANSWER\n; name exists, no data of the requested type");
            if let Some(denial) = denial {
                println!(";; denial proved by NXT at {}", denial.owner.to_text(None));
            }
        }
        LookupOutcome::NegativeCache { ttl } => println!("\n;; ANSWER\n; cached negative answer, ttl={ttl}"),
    }
    Ok(())
}

fn print_section(heading: &str, owner: &Name, rtype: RecordType, slab: &dnscore::rdataslab::RdataSlab, ttl: u32) {
    println!("\n;; {heading}");
    for entry in slab.entries() {
        let mut buf = dnscore::buffer::Buffer::new(entry);
        match RData::from_wire(rtype, &mut buf, entry.len()) {
            Ok(rdata) => println!("{}\t{}\tIN\t{}\t{}", owner.to_text(None), ttl, rtype, rdata.to_text(None)),
            Err(err) => println!("{}\t{}\tIN\t{}\t; undecodable: {err}", owner.to_text(None), ttl, rtype),
        }
    }
}

fn run_check(zone_file: &PathBuf, origin: &str) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(zone_file)?;
    let origin_name = Name::from_text(origin, None)?;
    let db = zonefile::load_zone(&origin_name, &text)?;

    let mut count = 0usize;
    for name in db.iter_names() {
        for (rtype, slab, ttl) in db.rdatasets_at(&name) {
            for entry in slab.entries() {
                let mut buf = dnscore::buffer::Buffer::new(entry);
                let rdata = RData::from_wire(rtype, &mut buf, entry.len())?;
                println!("{}\t{}\tIN\t{}\t{}", name.to_text(None), ttl, rtype, rdata.to_text(None));
                count += 1;
            }
        }
    }
    eprintln!(";; zone {} loaded OK, {count} rdata records", origin_name.to_text(None));
    Ok(())
}

/// A zone file with no `-o/--origin` given is expected to start with an
/// `$ORIGIN` directive, as every zone file this tool is likely to be pointed
/// at does; if it has none, `run_query` falls back to erroring out through
/// `Name::from_text`'s rejection of an empty string.
fn sniff_origin(text: &str) -> Result<&str, Box<dyn std::error::Error>> {
    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("$ORIGIN") {
            return Ok(rest.trim());
        }
    }
    Err("no --origin given and no $ORIGIN directive found in the zone file".into())
}
