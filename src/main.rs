use clap::Parser;

use mlfq_scheduler::{render, Config, Scheduler, SeededRng};

/// Drive the simulated scheduler until `max-pcb-total` PCBs have been
/// created, then tear it down and report.
#[derive(Parser)]
#[command(name = "mlfq-scheduler", about = "Simulated MLFQ round-robin CPU scheduler")]
struct Args {
    /// Seed the RNG for a reproducible run. Wall-clock seeded if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured total PCB creation cap.
    #[arg(long)]
    max_pcb_total: Option<u32>,

    /// Render the full register file for every PCB, not just pid/state/pc.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::default();
    if let Some(cap) = args.max_pcb_total {
        config.max_pcb_total = cap;
    }

    let mut rng = match args.seed {
        Some(seed) => SeededRng::from_seed(seed),
        None => SeededRng::from_wall_clock(),
    };

    let mut sched = Scheduler::construct(config);

    while sched.created_total() < config.max_pcb_total as u64 {
        let report = match sched.tick(&mut rng) {
            Ok(report) => report,
            Err(err) => {
                log::error!("tick failed: {err}");
                sched.destruct();
                std::process::exit(1);
            }
        };

        if report.arrivals > 0 {
            log::info!("{} arrival(s) this tick", report.arrivals);
        }
        if let Some(pid) = report.dispatched_pid {
            log::info!("dispatched pid {pid}");
        }
        if let Some(pid) = report.halted_pid {
            log::info!("halted pid {pid}");
        }
        if report.reclaimed > 0 {
            log::info!("reclaimed {} pid(s)", report.reclaimed);
        }

        if args.verbose {
            if let Some(running) = sched.running() {
                println!("{}", render::pcb_line(running, true));
            }
            print!("{}", render::priority_queue(sched.ready()));
        }
    }

    let teardown = sched.destruct();
    println!(
        "=== Scheduler Teardown ===\ncreated:   {:>8}\ndestroyed: {:>8}",
        teardown.created_total, teardown.destroyed_total
    );
}
