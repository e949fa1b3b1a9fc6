//! Command-line parsing.

use tm_ir::{ThereminConfig, Waveform};

pub const USAGE: &str = "\
Usage: theremulator [--trace <file|->] [--wav <out.wav>] [--seconds <n>] [options]

Sources:
  --trace <file|->     replay a detection trace (- reads stdin)
                       (default: built-in demo performance)
Output:
  --wav <out.wav>      render offline to a WAV file instead of playing
  --seconds <n>        stop after n seconds
Options:
  --min-octave <n>     lowest octave (default 3)
  --max-octave <n>     octave above the highest note (default 5)
  --a4 <hz>            reference pitch (default 440)
  --waveform <name>    sine, square, triangle or sawtooth (default sine)
  --continuous         disable note quantization
  --calibration <s>    calibration window in seconds (default 5)
  --sample-rate <hz>   output sample rate (default 44100)
  --no-mirror          input frames are not mirrored";

/// Where detection frames come from.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceArg {
    Demo,
    Stdin,
    File(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CliArgs {
    pub source: SourceArg,
    pub wav: Option<String>,
    pub seconds: Option<f64>,
    pub config: ThereminConfig,
    pub help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            source: SourceArg::Demo,
            wav: None,
            seconds: None,
            config: ThereminConfig::default(),
            help: false,
        }
    }
}

pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs, String> {
    let mut out = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| format!("missing value for {}", name))
        };
        match arg.as_str() {
            "-h" | "--help" => out.help = true,
            "--trace" => {
                let v = value("--trace")?;
                out.source = if v == "-" {
                    SourceArg::Stdin
                } else {
                    SourceArg::File(v)
                };
            }
            "--wav" => out.wav = Some(value("--wav")?),
            "--seconds" => {
                let secs: f64 = number("--seconds", &value("--seconds")?)?;
                if !secs.is_finite() || secs <= 0.0 {
                    return Err(format!("--seconds must be positive, got {}", secs));
                }
                out.seconds = Some(secs);
            }
            "--min-octave" => out.config.min_octave = number("--min-octave", &value("--min-octave")?)?,
            "--max-octave" => out.config.max_octave = number("--max-octave", &value("--max-octave")?)?,
            "--a4" => out.config.a4_hz = number("--a4", &value("--a4")?)?,
            "--waveform" => {
                let name = value("--waveform")?;
                if !Waveform::is_known(&name) {
                    log::warn!("unknown waveform '{}', using {}", name, Waveform::Sine);
                }
                out.config.waveform = Waveform::from_name(&name);
            }
            "--continuous" => out.config.perfect_pitch = false,
            "--calibration" => {
                out.config.calibration_seconds = number("--calibration", &value("--calibration")?)?
            }
            "--sample-rate" => out.config.sample_rate = number("--sample-rate", &value("--sample-rate")?)?,
            "--no-mirror" => out.config.mirrored_input = false,
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }

    if !out.help {
        out.config.validate().map_err(|e| e.to_string())?;
    }
    Ok(out)
}

fn number<T: std::str::FromStr>(flag: &str, text: &str) -> Result<T, String> {
    text.parse()
        .map_err(|_| format!("invalid value '{}' for {}", text, flag))
}
