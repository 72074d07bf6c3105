//! calando CLI — play a music file through the calando audio engine.
//!
//! Drives the engine's 60 Hz update loop from a plain sleep; fades and
//! instance cleanup only advance inside `update`.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use calando_audio::{AudioAction, create_audio_engine};
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(
    name = "calando",
    about = "Play music and sound effects through the calando engine"
)]
struct Args {
    /// Music file to play (wav, mp3 or flac)
    music: PathBuf,

    /// Sound effect layered over the music at startup
    #[arg(long)]
    sfx: Option<PathBuf>,

    /// Music volume, 0-100
    #[arg(long, default_value_t = 100)]
    volume: i32,

    /// Fade the music in over this many milliseconds
    #[arg(long, default_value_t = 0)]
    fade_in: u64,

    /// Fade the music out over this many milliseconds before exiting
    #[arg(long, default_value_t = 0)]
    fade_out: u64,

    /// Loop the music until the duration runs out
    #[arg(long = "loop")]
    repeat: bool,

    /// How long to keep playing, in seconds
    #[arg(long, default_value_t = 10)]
    duration: u64,
}

/// One 60 Hz frame.
const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut audio = create_audio_engine()?;
    audio.set_music_volume(args.volume);

    let key = if args.fade_in > 0 {
        audio.fade_in_music(&args.music, args.repeat, Duration::from_millis(args.fade_in))?
    } else {
        let key = audio.play_music(&args.music)?;
        if args.repeat {
            audio.operate_current_music(AudioAction::Loop);
        }
        key
    };
    info!("playing {} (key {})", args.music.display(), key.0);

    if let Some(sfx) = &args.sfx {
        audio.play_sound_effect(sfx)?;
        info!("layered {}", sfx.display());
    }

    let mut frames = args.duration.saturating_mul(60);
    while frames > 0
        && (audio.is_music_playing() || audio.is_music_paused() || audio.is_music_fading())
    {
        audio.update();
        thread::sleep(FRAME);
        frames -= 1;
    }

    if args.fade_out > 0 && audio.is_music_playing() {
        info!("fading out over {} ms", args.fade_out);
        audio.fade_out_music(Duration::from_millis(args.fade_out));
        while audio.is_music_fading() {
            audio.update();
            thread::sleep(FRAME);
        }
    }

    audio.dispose();
    info!("done");
    Ok(())
}
