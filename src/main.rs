use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use zaru_mouse::{
    config::Config,
    control::{ControlLoop, Exit},
    recording::{JsonLinesSink, JsonLinesSource},
    resolution::Resolution,
};

/// Controls the pointer with hand gestures.
///
/// Reads hand landmarks as JSON Lines, one camera frame per line, and writes the resulting pointer
/// actions to stdout, one JSON object per line.
#[derive(Parser)]
#[command(name = "zaru-mouse", version, long_about = None)]
struct Cli {
    /// Landmark stream to read, `-` for stdin
    #[arg(long, short, default_value = "-")]
    input: PathBuf,

    /// JSON configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Screen resolution (WIDTHxHEIGHT)
    #[arg(long)]
    screen: Option<Resolution>,

    /// Camera resolution for frames that don't specify one (WIDTHxHEIGHT)
    #[arg(long)]
    camera: Option<Resolution>,

    /// Camera border excluded from the trackpad area, in pixels
    #[arg(long)]
    margin: Option<u32>,

    /// Pointer smoothing factor, greater than 1.0
    #[arg(long)]
    lag: Option<f32>,

    /// Scroll distance per frame
    #[arg(long)]
    scroll: Option<i32>,

    /// Mirror landmarks horizontally
    #[arg(long)]
    mirror: bool,
}

impl Cli {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(screen) = self.screen {
            config.screen = screen;
        }
        if let Some(camera) = self.camera {
            config.camera = camera;
        }
        if let Some(margin) = self.margin {
            config.trackpad_margin = margin;
        }
        if let Some(lag) = self.lag {
            config.lag_factor = lag;
        }
        if let Some(scroll) = self.scroll {
            config.scroll_amount = scroll;
        }
        config.mirror |= self.mirror;

        config.validate()?;
        Ok(config)
    }

    fn open_input(&self) -> anyhow::Result<Box<dyn BufRead>> {
        if self.input.as_os_str() == "-" {
            return Ok(Box::new(io::stdin().lock()));
        }
        let file = File::open(&self.input)
            .with_context(|| format!("failed to open '{}'", self.input.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

fn main() -> anyhow::Result<()> {
    zaru_mouse::init_logger!();

    let cli = Cli::parse();
    let config = cli.config()?;
    log::debug!("{config:?}");

    let mut source = JsonLinesSource::new(cli.open_input()?, config.camera);
    let mut sink = JsonLinesSink::new(io::stdout().lock());

    let mut control = ControlLoop::new(config.pointer_mapper());
    control.set_mirror(config.mirror);
    let exit = control.run(&mut source, &mut sink)?;

    let stats = control.stats();
    log::info!(
        "{}: {} frames, {} with a hand, {} actions",
        match exit {
            Exit::Terminated => "terminated by gesture",
            Exit::SourceExhausted => "end of input",
        },
        stats.frames,
        stats.hands,
        stats.actions,
    );

    Ok(())
}
