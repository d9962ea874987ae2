use anyhow::Result;
use clap::Parser;
use log::info;
use qlearn::{config::DqnCartpoleConfig, evaluate, train};
use qlearn_candle_agent::Device;
use qlearn_core::record::{AggregateRecorder, LogRecorder};
use qlearn_tensorboard::TensorboardRecorder;
use std::path::PathBuf;

/// Train DQN agent in cart-pole environment, then evaluate it greedily
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML file of the configuration, the default configuration is used if not given
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of training episodes
    #[arg(short, long)]
    episodes: Option<usize>,

    /// Seed of the environment, the replay memory and the agent
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write records to TensorBoard event files in this directory instead of the log
    #[arg(short, long)]
    logdir: Option<PathBuf>,

    /// Force computation on the CPU
    #[arg(long, default_value_t = false)]
    cpu: bool,

    /// Print the configuration as YAML and exit
    #[arg(long, default_value_t = false)]
    dump_config: bool,
}

fn load_config(args: &Args) -> Result<DqnCartpoleConfig> {
    let mut config = match &args.config {
        Some(path) => DqnCartpoleConfig::load(path)?,
        None => DqnCartpoleConfig::default(),
    };
    if let Some(n) = args.episodes {
        config = config.n_episodes(n);
    }
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if args.cpu {
        config.agent_config = config.agent_config.device(Device::Cpu);
    }
    Ok(config)
}

fn create_recorder(args: &Args) -> Box<dyn AggregateRecorder> {
    match &args.logdir {
        Some(logdir) => Box::new(TensorboardRecorder::new(logdir)),
        None => Box::new(LogRecorder::new()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    if args.dump_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    let device = config.agent_config.device.resolve()?;
    let mut recorder = create_recorder(&args);
    let mut agent = train(&config, device, recorder.as_mut())?;

    let record = evaluate(&config, &mut agent)?;
    info!(
        "Evaluation over {} episodes: return = {}, episode length = {}",
        config.n_eval_episodes,
        record.get_scalar("eval_return")?,
        record.get_scalar("eval_episode_length")?,
    );

    Ok(())
}
