//! Shimmer - Procedural UI sound cues and ambient particle effects

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use shimmer::config::{self, EmissionProfile, LoggingConfig, ShimmerConfig};
use shimmer::engine::{default_device_name, list_output_devices, render_cue, CpalHost, PlayOutcome};
use shimmer::fx::{
    mount_glyph_rain, mount_particles, run_realtime, run_virtual, Emitter, Field, FieldStats, Stage,
};
use shimmer::viz::run_viz;
use shimmer::ToneSynthesizer;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands, Effect};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Cue { cue } => {
            let cfg = load(&cli.config, false)?;
            let mut synth = ToneSynthesizer::new(CpalHost::from_config(&cfg.audio), cfg.cues.clone());

            match synth.play(cue) {
                PlayOutcome::Scheduled { tones } => {
                    println!("Playing {} cue ({} tone{})", cue, tones, if tones == 1 { "" } else { "s" });
                    // Let the stream drain before tearing it down
                    let deadline = Instant::now() + Duration::from_secs_f64(cue.span(&cfg.cues) + 1.0);
                    while synth.time_remaining() > 0.0 && Instant::now() < deadline {
                        std::thread::sleep(Duration::from_millis(20));
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
                PlayOutcome::Degraded(err) => println!("No sound: {}", err),
            }
            synth.destroy();
        }

        Commands::Render { cue, output } => {
            let cfg = load(&cli.config, false)?;
            println!("Rendering {} cue to {:?}...", cue, output);
            let summary = render_cue(cue, &cfg.audio, &cfg.cues, &output)?;
            println!(
                "Wrote {} samples ({:.3}s, peak {:.3})",
                summary.samples, summary.duration_secs, summary.peak
            );
        }

        Commands::Watch { effect, viewport } => {
            // Log output would tear through the alternate screen
            let cfg = load(&cli.config, true)?;
            let view = viewport.to_viewport();
            let mut synth = ToneSynthesizer::new(CpalHost::from_config(&cfg.audio), cfg.cues.clone());

            match effect {
                Effect::Particles => run_viz(
                    "particles",
                    |now| mount_particles(&cfg, &view, StdRng::from_entropy(), now),
                    &mut synth,
                )?,
                Effect::Rain => run_viz(
                    "glyph rain",
                    |now| {
                        let stage = Stage::new(view.width as f32, view.height as f32);
                        mount_glyph_rain(&cfg, &view, stage, StdRng::from_entropy(), now)
                    },
                    &mut synth,
                )?,
            }
        }

        Commands::Simulate {
            effect,
            viewport,
            duration_ms,
            frame_ms,
            seed,
            realtime,
        } => {
            let cfg = load(&cli.config, false)?;
            let view = viewport.to_viewport();
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let run = Run {
                frame: Duration::from_millis(frame_ms),
                duration: Duration::from_millis(duration_ms),
                realtime,
            };

            let report = match effect {
                Effect::Particles => run.simulate(mount_particles(&cfg, &view, rng, Duration::ZERO))?,
                Effect::Rain => {
                    let stage = Stage::new(view.width as f32, view.height as f32);
                    run.simulate(mount_glyph_rain(&cfg, &view, stage, rng, Duration::ZERO))?
                }
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Devices => {
            println!("Available audio output devices:\n");

            match default_device_name() {
                Some(name) => println!("Default output: {}\n", name),
                None => println!("No default output device\n"),
            }

            let devices = list_output_devices();
            if devices.is_empty() {
                println!("  (none found)");
            }
            for (name, config) in devices {
                println!("  - {} ({} Hz, {} ch)", name, config.sample_rate.0, config.channels);
            }
        }

        Commands::Check => {
            println!("Checking configuration at {:?}...", cli.config);

            match config::load_config(&cli.config) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
                    println!("  Buffer size: {}", cfg.audio.buffer_size);
                    println!("  Volume: {:.0}%", cfg.audio.volume * 100.0);
                    println!(
                        "  Cues: gain {} floor {} gap {}ms",
                        cfg.cues.gain, cfg.cues.floor, cfg.cues.notification_gap_ms
                    );
                    println!("  Mobile below: {}px", cfg.viewport.mobile_breakpoint);
                    print_profile("Particles (desktop)", &cfg.particles.desktop);
                    print_profile("Particles (mobile)", &cfg.particles.mobile);
                    print_profile("Glyphs (desktop)", &cfg.glyphs.desktop);
                    print_profile("Glyphs (mobile)", &cfg.glyphs.mobile);
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let path = Path::new("shimmer.yaml");
            if path.exists() {
                println!("shimmer.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, config::EXAMPLE_CONFIG)?;
                println!("Created shimmer.yaml with example configuration.");
            }
        }
    }

    Ok(())
}

/// Load configuration and install the log subscriber
fn load(path: &Path, quiet: bool) -> Result<ShimmerConfig> {
    let cfg = config::load_or_default(path)?;
    init_logging(&cfg.logging, quiet)?;
    Ok(cfg)
}

fn init_logging(logging: &LoggingConfig, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("invalid log level: {}", logging.level))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match &logging.file {
        Some(file) => {
            let file = File::create(file)
                .with_context(|| format!("failed to create log file: {:?}", file))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if quiet => builder.with_writer(std::io::sink).init(),
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn print_profile(label: &str, profile: &EmissionProfile) {
    print!("  {}: every {}ms x{}", label, profile.interval_ms, profile.per_tick);
    if profile.initial_burst > 0 {
        print!(", burst {} over {}ms", profile.initial_burst, profile.burst_window_ms);
    }
    println!();
}

struct Run {
    frame: Duration,
    duration: Duration,
    realtime: bool,
}

#[derive(Serialize)]
struct SimulationReport {
    effect: &'static str,
    profile: EmissionProfile,
    mounted: FieldStats,
    unmounted: FieldStats,
}

impl Run {
    fn simulate<E: Emitter>(&self, mut field: Field<E>) -> Result<SimulationReport> {
        info!(
            "Simulating {} for {:?} ({:?} frames)",
            field.emitter().name(),
            self.duration,
            self.frame
        );

        let mounted = if self.realtime {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            rt.block_on(run_realtime(&mut field, self.frame, self.duration))
        } else {
            run_virtual(&mut field, self.frame, self.duration)
        };

        let reclaimed = field.unmount();
        info!("Unmounted, reclaimed {} elements", reclaimed);

        Ok(SimulationReport {
            effect: field.emitter().name(),
            profile: *field.profile(),
            mounted,
            unmounted: field.stats(),
        })
    }
}
