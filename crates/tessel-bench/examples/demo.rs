//! End-to-end demo driving both Tessel components.
//!
//! Demonstrates: scatter sites → compute a frame on each path → compare
//! timings → remove a site → run a race → poll positions → print ranking.
//!
//! Run with `RUST_LOG=debug` to see per-frame and per-race log lines.

use std::thread;

use log::info;
use tessel_bench::{demo_race_config, reference_profile};
use tessel_race::RaceSimulator;
use tessel_raster::{ExecutionMode, PartitionerConfig};
use tessel_space::{DistanceMetric, Point};

fn main() {
    env_logger::init();

    println!("=== Tessel Nearest-Site Raster ===\n");
    for metric in DistanceMetric::ALL {
        let (mut p, size) = reference_profile(metric, 42, PartitionerConfig::default());
        println!(
            "{metric}: {} sites on {}x{}, {} workers",
            p.len(),
            size.width(),
            size.height(),
            p.worker_count()
        );

        let seq = p.compute(size, ExecutionMode::SingleThreaded).unwrap();
        let par = p.compute(size, ExecutionMode::MultiThreaded).unwrap();
        for frame in [&seq, &par] {
            let m = &frame.metrics;
            println!(
                "  {:<16} wall {:>8.2} ms   cpu {:>8.2} ms",
                m.mode.to_string(),
                m.wall_ms(),
                m.cpu_ms()
            );
        }
        println!("  identical output: {}", seq.pixels == par.pixels);

        let removed = p.remove_nearest(Point::new(320.0, 240.0)).unwrap();
        if let Some(site) = removed {
            println!("  removed site {} nearest the centre", site.id());
        }
        println!();
    }

    println!("=== Tessel Race ===\n");
    let mut sim = RaceSimulator::new(demo_race_config(7)).unwrap();
    let race = sim.start_count(4).unwrap();
    info!("started {race}");

    let poll_every = sim.config().poll_interval * 10;
    loop {
        let snap = sim.poll(race).unwrap();
        let line: Vec<String> = snap
            .names
            .iter()
            .zip(&snap.positions)
            .map(|(n, p)| format!("{n} {p:>6.1}"))
            .collect();
        println!(
            "[{:>6.2}s] {}  ({}/{} finished)",
            snap.elapsed.as_secs_f64(),
            line.join("  "),
            snap.finished_count,
            snap.names.len()
        );
        if snap.phase.is_terminal() {
            break;
        }
        thread::sleep(poll_every);
    }

    match sim.result(race) {
        Ok(result) => {
            println!();
            for s in &result.standings {
                let time = s
                    .finish_time
                    .map(|t| format!("{:.2}s", t.as_secs_f64()))
                    .unwrap_or_else(|| "-".into());
                println!("  {}. {:<8} {:>7.1}  {}", s.rank, s.name, s.position, time);
            }
            if let Some(w) = result.winner {
                println!("\nWinner: {}", w.name);
            }
        }
        Err(e) => println!("race ended without a ranking: {e}"),
    }
}
