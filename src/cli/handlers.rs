use std::{
    io::{self, BufWriter, Write},
    time::Instant,
};

use tracing::{debug, info};

use crate::core::{
    alert::BannerColors,
    config::{ChartPolicy, Config, Variant},
    controller::{Controller, Update},
    error::AppError,
    events::{Line, read_events_from_path},
    session::{Outcome, Session, spawn},
};

use super::parse::{ApproxArgs, ReplayArgs};

pub fn approx(a: &ApproxArgs) -> Result<(), AppError> {
    let cfg = a.config.build()?;
    let banner = cfg.banner;
    let mut controller = Controller::new(cfg);

    let t0 = Instant::now();
    let update = controller.request_term_count(a.terms)?;
    debug!(elapsed = ?t0.elapsed(), stats = ?controller.accumulator().stats(), "approx done");

    println!("terms         : {}", update.state.power());
    println!("approximation : {}", update.approximation);
    if let Some(line) = update.alert.render(&banner) {
        println!("{line}");
    }
    Ok(())
}

/// Every partial sum `1..=N`; the chart policy is forced to dense.
pub fn series(a: &ApproxArgs) -> Result<(), AppError> {
    let mut cfg = a.config.build()?;
    cfg.chart = ChartPolicy::Dense;
    let mut controller = Controller::new(cfg);

    let t0 = Instant::now();
    let update = controller.request_term_count(a.terms)?;
    debug!(elapsed = ?t0.elapsed(), rows = update.samples.len(), "series computed");

    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "term_count,approximation")?;
    for p in &update.samples {
        writeln!(out, "{},{}", p.term_count, p.value)?;
    }
    out.flush()?;
    Ok(())
}

pub fn replay(a: &ReplayArgs) -> Result<(), AppError> {
    let cfg = a.config.build()?;
    let t_ingest = Instant::now();
    let lines = read_events_from_path(&a.file)?;
    debug!(elapsed = ?t_ingest.elapsed(), lines = lines.len(), "events ingested");

    let printer = Printer::new(cfg.banner, a.samples);
    if a.threaded {
        replay_threaded(cfg, &lines, &printer)
    } else {
        replay_inline(cfg, &lines, &printer);
        Ok(())
    }
}

fn replay_inline(cfg: Config, lines: &[Line], printer: &Printer) {
    let mut session = Session::new(cfg);
    for line in lines {
        match line {
            Line::Event(e) => {
                session.submit(*e);
            }
            Line::Flush => printer.print_all(session.flush()),
        }
    }
    printer.print_all(session.flush());
    info!(stats = ?session.controller().accumulator().stats(), "replay finished");
}

/// Events go to the worker as fast as they are read; `flush` lines only
/// matter to the inline replay.
fn replay_threaded(cfg: Config, lines: &[Line], printer: &Printer) -> Result<(), AppError> {
    let (tx, rx, handle) = spawn(cfg);
    let events = lines.iter().filter_map(|l| match l {
        Line::Event(e) => Some(*e),
        Line::Flush => None,
    });
    for event in events {
        tx.send(event)?;
    }
    drop(tx);
    for outcome in rx {
        printer.print(outcome);
    }
    handle.join().map_err(|_| AppError::WorkerDisconnected)?;
    info!("threaded replay finished");
    Ok(())
}

struct Printer {
    banner: BannerColors,
    with_samples: bool,
}

impl Printer {
    fn new(banner: BannerColors, with_samples: bool) -> Self {
        Self {
            banner,
            with_samples,
        }
    }

    fn print_all(&self, outcomes: Vec<Outcome>) {
        for o in outcomes {
            self.print(o);
        }
    }

    fn print(&self, outcome: Outcome) {
        match outcome {
            Outcome::Updated { ticket, update } => self.print_update(ticket, &update),
            Outcome::Rejected { ticket, error } => println!("#{ticket} rejected: {error}"),
        }
    }

    fn print_update(&self, ticket: u64, update: &Update) {
        let s = update.state;
        println!(
            "#{ticket} power={} limit={} approximation={}",
            s.power(),
            s.range_limit(),
            update.approximation
        );
        if let Some(line) = update.alert.render(&self.banner) {
            println!("    {line}  (intensity {:.3})", update.alert.intensity);
        }
        if self.with_samples {
            for p in &update.samples {
                println!("    {:>6}  {}", p.term_count, p.value);
            }
        }
    }
}

/// Describe the shipped configurations.
pub fn variants() -> Result<(), AppError> {
    for (name, v) in [("classic", Variant::Classic), ("ranged", Variant::Ranged)] {
        let cfg = v.builder().build()?;
        println!("\n{name}");
        println!("  max power     : {}", cfg.max_power);
        println!("  range limits  : {:?}", cfg.range_limits);
        println!("  warning from  : {}", cfg.warning_threshold);
        println!("  mode          : {:?}", cfg.mode);
        println!("  chart         : {:?}", cfg.chart);
    }
    println!(
        "\nExample invocations\n\
         -------------------\n\
         • One value        : leibniz approx 1000\n\
         • Classic variant  : leibniz approx 3000 --variant classic\n\
         • CSV sequence     : leibniz series 500 --digits 10\n\
         • Replay a drag    : printf 'n 10\\nn 20\\nlimit 100\\nn 80\\n' | leibniz replay -\n"
    );
    Ok(())
}
