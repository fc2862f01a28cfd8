//! Ludics CLI: behaviour checks, MALL constructors and design composition
//!
//! Commands:
//!   ludics check         ludicability verdict for one or more behaviour files
//!   ludics report        per-condition breakdown as JSON
//!   ludics dual          polarity dual of a behaviour
//!   ludics plus|with|tensor|par   combine two behaviours
//!   ludics shift-pos|shift-neg    shift a behaviour
//!   ludics fingerprint   canonical fingerprint of a behaviour
//!   ludics import        load designs, loci and acts into the store
//!   ludics designs       list stored designs
//!   ludics directory     labels a design opens at a locus
//!   ludics preflight     gate the composition of two designs
//!   ludics delocate      clone a design under a tag
//!   ludics fax           import a slice of one design into another
//!   ludics demo          run the whole pipeline on built-in data

use ludics_core::act::{Act, Polarity};
use ludics_core::compose::{
    clone_design_with_shift, directory_at, fax_from_scope, preflight, CancelToken, CompositionMode, FaxFilter,
    PreflightOutcome, PreflightRequest,
};
use ludics_core::config::LudicsConfig;
use ludics_core::locus::LocusPath;
use ludics_core::mall::{ve_par, ve_plus, ve_shift_neg, ve_shift_pos, ve_tensor, ve_with};
use ludics_core::path::Path;
use ludics_core::store::{ActKind, DesignDraft, DesignStore, JsonFileStore, MemoryStore, StoreSnapshot, WriteBatch};
use ludics_core::ve::Ve;
use std::env;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::Semaphore;

const CONFIG_FILE: &str = "ludics.json";

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

fn print_usage() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║        ludics — behaviours, saturation & composition         ║
╚══════════════════════════════════════════════════════════════╝

Usage: ludics <command> [options]

Behaviour files hold {{"base": "0", "paths": [[{{"pol": "pos", "locus": "0", "key": "1"}}], ...]}}

Commands:
  check       <file>...                                  Ludicability verdict per file (parallel)
  report      <file>                                     Per-condition report as JSON
  dual        <file>                                     Polarity dual
  plus|with|tensor|par <a> <b>                           MALL connectives
  shift-pos|shift-neg  <file>                            Shifts
  fingerprint <file>                                     Canonical fingerprint
  import      <snapshot.json>                            Add designs/loci/acts to the store
  designs     [dialogue]                                 List stored designs
  directory   <design> [locus]                           Directory at a locus (default: 0)
  preflight   <dialogue> <pos> <neg> [assoc|partial|spiritual]
  delocate    <design> <tag>                             Clone a design under a tag
  fax         <source> <target> <locus> [--kind K] [--polarity P] [--max-depth N]
  demo                                                   Run the full pipeline in memory

Configuration is read from ./{CONFIG_FILE} (or $LUDICS_CONFIG) when present.

Examples:
  ludics check a.json b.json
  ludics plus a.json b.json > ab.json
  ludics preflight dlg-1 P-design O-design spiritual
  ludics fax P1 P2 0.99 --kind PROPER --max-depth 1
"#
    );
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("  Failed to read config: {}", e);
            return;
        }
    };

    let result = match args[1].as_str() {
        "check" => cmd_check(&config, &args[2..]).await,
        "report" => cmd_report(&config, &args[2..]),
        "dual" => cmd_unary(&args[2..], |ve| ve.dual()),
        "shift-pos" => cmd_unary(&args[2..], ve_shift_pos),
        "shift-neg" => cmd_unary(&args[2..], ve_shift_neg),
        "plus" => cmd_binary(&args[2..], ve_plus),
        "with" => cmd_binary(&args[2..], ve_with),
        "tensor" => cmd_binary(&args[2..], ve_tensor),
        "par" => cmd_binary(&args[2..], ve_par),
        "fingerprint" => cmd_fingerprint(&args[2..]),
        "import" => cmd_import(&config, &args[2..]),
        "designs" => cmd_designs(&config, &args[2..]),
        "directory" => cmd_directory(&config, &args[2..]),
        "preflight" => cmd_preflight(&config, &args[2..]),
        "delocate" => cmd_delocate(&config, &args[2..]),
        "fax" => cmd_fax(&config, &args[2..]),
        "demo" => cmd_demo(&config),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("  Operation failed: {}", e);
        std::process::exit(1);
    }
}

fn load_config() -> CliResult<LudicsConfig> {
    let path = env::var("LUDICS_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
    LudicsConfig::load_or_default(&path).map_err(|e| e.to_string().into())
}

fn read_ve(path: &str) -> CliResult<Ve> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_store(config: &LudicsConfig) -> CliResult<JsonFileStore> {
    Ok(JsonFileStore::open(&config.store_path)?)
}

async fn cmd_check(config: &LudicsConfig, args: &[String]) -> CliResult<()> {
    if args.is_empty() {
        eprintln!("Usage: ludics check <file>...");
        return Ok(());
    }

    let permits = Arc::new(Semaphore::new(config.max_parallel_checks.max(1)));
    let mut handles = Vec::new();
    for file in args {
        let permits = permits.clone();
        let checker = config.checker();
        let file = file.clone();
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let verdict = tokio::task::spawn_blocking(move || -> CliResult<(String, bool, bool, String)> {
                let ve = read_ve(&file)?;
                let report = checker.report(&ve);
                Ok((file, report.ludicable, report.truncated(), ve.summary()))
            })
            .await??;
            Ok::<_, Box<dyn Error + Send + Sync>>(verdict)
        }));
    }

    let mut failures = 0;
    for (file, handle) in args.iter().zip(handles) {
        match handle.await {
            Ok(Ok((file, ludicable, truncated, summary))) => {
                let mark = if ludicable { "ludicable" } else { "NOT ludicable" };
                let note = if truncated { " (clique enumeration truncated)" } else { "" };
                println!("  {:<32} {:<14} {}{}", file, mark, summary, note);
            }
            Ok(Err(e)) => {
                failures += 1;
                eprintln!("  {:<32} error: {}", file, e);
            }
            Err(e) => {
                failures += 1;
                eprintln!("  {:<32} task failed: {}", file, e);
            }
        }
    }
    if failures > 0 {
        return Err(format!("{} of {} files could not be checked", failures, args.len()).into());
    }
    Ok(())
}

fn cmd_report(config: &LudicsConfig, args: &[String]) -> CliResult<()> {
    let Some(file) = args.first() else {
        eprintln!("Usage: ludics report <file>");
        return Ok(());
    };
    let ve = read_ve(file)?;
    print_json(&config.checker().report(&ve))
}

fn cmd_unary(args: &[String], op: impl Fn(&Ve) -> Ve) -> CliResult<()> {
    let Some(file) = args.first() else {
        eprintln!("Usage: ludics dual|shift-pos|shift-neg <file>");
        return Ok(());
    };
    print_json(&op(&read_ve(file)?))
}

fn cmd_binary(args: &[String], op: fn(&Ve, &Ve) -> Ve) -> CliResult<()> {
    if args.len() < 2 {
        eprintln!("Usage: ludics plus|with|tensor|par <a> <b>");
        return Ok(());
    }
    let (a, b) = (read_ve(&args[0])?, read_ve(&args[1])?);
    print_json(&op(&a, &b))
}

fn cmd_fingerprint(args: &[String]) -> CliResult<()> {
    let Some(file) = args.first() else {
        eprintln!("Usage: ludics fingerprint <file>");
        return Ok(());
    };
    println!("{}", read_ve(file)?.fingerprint());
    Ok(())
}

fn cmd_import(config: &LudicsConfig, args: &[String]) -> CliResult<()> {
    let Some(file) = args.first() else {
        eprintln!("Usage: ludics import <snapshot.json>");
        return Ok(());
    };
    let snapshot: StoreSnapshot = serde_json::from_str(&std::fs::read_to_string(file)?)?;
    let batch = WriteBatch {
        loci: snapshot.loci,
        designs: snapshot.designs,
        acts: snapshot.acts,
    };
    let count = batch.len();
    let mut store = open_store(config)?;
    store.commit(batch)?;
    println!("  Imported {} records into {}", count, store.path().display());
    Ok(())
}

fn cmd_designs(config: &LudicsConfig, args: &[String]) -> CliResult<()> {
    let store = open_store(config)?;
    let snapshot = store.memory().snapshot();
    let designs: Vec<_> = snapshot
        .designs
        .iter()
        .filter(|d| args.first().map_or(true, |dlg| &d.dialogue_id == dlg))
        .collect();
    if designs.is_empty() {
        println!("\n  No designs. Use 'ludics import' or 'ludics demo' to get started.");
        return Ok(());
    }
    println!("\n  Designs ({}):", designs.len());
    println!("  {}", "-".repeat(80));
    for design in designs {
        let acts = store.acts(&design.id)?.len();
        let shifted = design
            .meta
            .provenance
            .as_ref()
            .map(|p| format!(" (from {} under {})", p.shifted_from, p.tag))
            .unwrap_or_default();
        println!(
            "  [{}] {} / {} | {} acts{}",
            design.id, design.dialogue_id, design.participant_id, acts, shifted
        );
    }
    Ok(())
}

fn cmd_directory(config: &LudicsConfig, args: &[String]) -> CliResult<()> {
    let Some(design_id) = args.first() else {
        eprintln!("Usage: ludics directory <design> [locus]");
        return Ok(());
    };
    let locus = match args.get(1) {
        Some(raw) => LocusPath::parse(raw)?,
        None => LocusPath::root(),
    };
    let store = open_store(config)?;
    let labels = directory_at(&store, design_id, &locus)?;
    print_json(&labels)
}

fn cmd_preflight(config: &LudicsConfig, args: &[String]) -> CliResult<()> {
    if args.len() < 3 {
        eprintln!("Usage: ludics preflight <dialogue> <pos> <neg> [assoc|partial|spiritual]");
        return Ok(());
    }
    let mode = match args.get(3) {
        Some(raw) => raw.parse::<CompositionMode>()?,
        None => config.composition_mode,
    };
    let request = PreflightRequest {
        dialogue_id: args[0].clone(),
        pos_design_id: args[1].clone(),
        neg_design_id: args[2].clone(),
        mode,
    };
    let mut store = open_store(config)?;
    let outcome = preflight(&mut store, &request, &CancelToken::new())?;
    print_json(&outcome)
}

fn cmd_delocate(config: &LudicsConfig, args: &[String]) -> CliResult<()> {
    if args.len() < 2 {
        eprintln!("Usage: ludics delocate <design> <tag>");
        return Ok(());
    }
    let mut store = open_store(config)?;
    let design = clone_design_with_shift(&mut store, &args[0], &args[1], &CancelToken::new())?;
    println!("  Delocated {} under {} as {}", args[0], args[1], design.id);
    Ok(())
}

fn cmd_fax(config: &LudicsConfig, args: &[String]) -> CliResult<()> {
    if args.len() < 3 {
        eprintln!("Usage: ludics fax <source> <target> <locus> [--kind K] [--polarity P] [--max-depth N]");
        return Ok(());
    }
    let target_locus = LocusPath::parse(&args[2])?;
    let mut filter = FaxFilter::default();
    let mut options = args[3..].iter();
    while let Some(flag) = options.next() {
        let value = options.next().ok_or_else(|| format!("{} needs a value", flag))?;
        match flag.as_str() {
            "--kind" => filter.kind = Some(value.parse()?),
            "--polarity" => filter.polarity = Some(value.parse()?),
            "--max-depth" => filter.max_depth = Some(value.parse()?),
            other => return Err(format!("unknown fax option: {}", other).into()),
        }
    }
    let mut store = open_store(config)?;
    let result = fax_from_scope(&mut store, &args[0], &args[1], &target_locus, &filter, &CancelToken::new())?;
    print_json(&result)
}

fn lp(raw: &str) -> CliResult<LocusPath> {
    Ok(LocusPath::parse(raw)?)
}

/// Small ludicable behaviour on base 0
fn demo_behaviour() -> CliResult<Ve> {
    let a = Path::new(vec![Act::positive(lp("0")?, "1")]);
    let c = a.extended(Act::negative(lp("0.1")?, "a"));
    let b = c.extended(Act::positive(lp("0.1.a")?, "x"));
    let bz = b.with_daimon_tail().ok_or("daimon tail of a positive path")?;
    let d = a.extended(Act::daimon(lp("0.1")?));
    let z = Path::new(vec![Act::daimon(lp("0")?)]);
    Ok(Ve::new(LocusPath::root(), vec![a, z, c, b, bz, d]))
}

fn cmd_demo(config: &LudicsConfig) -> CliResult<()> {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║              ludics — Full Demo                              ║
║       Saturation + MALL + Preflight + Delocation + Fax       ║
╚══════════════════════════════════════════════════════════════╝
"#
    );
    let checker = config.checker();

    // Step 1: Check a behaviour
    println!("Step 1: Checking a behaviour...");
    println!("{}", "-".repeat(60));
    let ve = demo_behaviour()?;
    println!("  {}", ve.summary());
    let report = checker.report(&ve);
    println!(
        "  prefix={} daimon={} pos-sat={} neg-sat={} | dual pre-ludicable={} | ludicable={}",
        report.direct.prefix_closed,
        report.direct.daimon_closed,
        report.direct.positively_saturated,
        report.direct.negatively_saturated,
        report.dual.is_pre_ludicable(),
        report.ludicable
    );
    println!("  dual ludicable: {}", checker.is_ludicable(&ve.dual()));

    // Step 2: MALL constructors
    println!("\nStep 2: MALL constructors...");
    println!("{}", "-".repeat(60));
    let other = Ve::new(
        LocusPath::root(),
        vec![
            Path::new(vec![Act::positive(lp("0")?, "2")]),
            Path::new(vec![Act::daimon(lp("0")?)]),
        ],
    );
    let ops: [(&str, fn(&Ve, &Ve) -> Ve); 4] = [("⊕", ve_plus), ("&", ve_with), ("⊗", ve_tensor), ("⅋", ve_par)];
    for (symbol, op) in ops {
        let combined = op(&ve, &other);
        println!("  A {} B: {}", symbol, combined.summary());
    }
    println!(
        "  ⊕ commutes on fingerprints: {}",
        ve_plus(&ve, &other).fingerprint() == ve_plus(&other, &ve).fingerprint()
    );
    println!("  ↑↓A = A: {}", ve_shift_neg(&ve_shift_pos(&ve)) == ve);

    // Step 3: Preflight on colliding designs
    println!("\nStep 3: Composition preflight...");
    println!("{}", "-".repeat(60));
    let mut store = MemoryStore::new();
    for draft in [
        DesignDraft::new("demo", "Proponent")
            .id("P")
            .positive("0", &["x", "y"])
            .negative("0.x", &["1"])
            .daimon(),
        DesignDraft::new("demo", "Opponent")
            .id("O")
            .positive("0", &["x"])
            .negative("0.x", &["2"]),
    ] {
        let batch = draft.stage(&store)?;
        store.commit(batch)?;
    }
    for mode in [CompositionMode::Assoc, CompositionMode::Partial] {
        let request = PreflightRequest {
            dialogue_id: "demo".into(),
            pos_design_id: "P".into(),
            neg_design_id: "O".into(),
            mode,
        };
        let outcome = preflight(&mut store, &request, &CancelToken::new())?;
        println!("  {:<10} {}", mode.to_string(), serde_json::to_string(&outcome)?);
    }

    // Step 4: Spiritual mode delocates both sides
    println!("\nStep 4: Spiritual preflight (delocation)...");
    println!("{}", "-".repeat(60));
    let request = PreflightRequest {
        dialogue_id: "demo".into(),
        pos_design_id: "P".into(),
        neg_design_id: "O".into(),
        mode: CompositionMode::Spiritual,
    };
    let outcome = preflight(&mut store, &request, &CancelToken::new())?;
    println!("  spiritual  {}", serde_json::to_string(&outcome)?);
    if let PreflightOutcome::Ready {
        pos_design_id,
        neg_design_id,
        ..
    } = &outcome
    {
        let again = PreflightRequest {
            dialogue_id: "demo".into(),
            pos_design_id: pos_design_id.clone(),
            neg_design_id: neg_design_id.clone(),
            mode: CompositionMode::Partial,
        };
        let outcome = preflight(&mut store, &again, &CancelToken::new())?;
        println!("  re-run     {}", serde_json::to_string(&outcome)?);
    }
    let clone = clone_design_with_shift(&mut store, "P", "T", &CancelToken::new())?;
    println!("  delocated P under T as {} ({} acts)", clone.id, store.acts(&clone.id)?.len());

    // Step 5: Fax
    println!("\nStep 5: Fax top-level proper acts of P into O at 0.99...");
    println!("{}", "-".repeat(60));
    let filter = FaxFilter {
        kind: Some(ActKind::Proper),
        polarity: Some(Polarity::Positive),
        max_depth: Some(1),
    };
    let result = fax_from_scope(&mut store, "P", "O", &lp("0.99")?, &filter, &CancelToken::new())?;
    println!("  faxed {} acts: {:?}", result.faxed_count, result.act_ids);
    println!(
        "  store: {} designs, {} loci, {} acts",
        store.design_count(),
        store.locus_count(),
        store.act_count()
    );

    println!("\nDemo complete.");
    Ok(())
}
