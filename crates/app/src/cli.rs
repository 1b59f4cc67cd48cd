//! Command line interface

use clap::Parser;
use std::path::PathBuf;

/// Lowest opacity the slider and the command line accept
pub const MIN_OPACITY: f32 = 0.1;

/// SimpleOverlay - pin an image above other windows, click-through by default
#[derive(Parser, Debug)]
#[command(name = "simple-overlay")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Image to show on startup
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Initial overlay opacity (0.1 - 1.0)
    #[arg(short, long, default_value = "1.0", value_parser = parse_opacity)]
    pub opacity: f32,

    /// Start in move mode instead of click-through
    #[arg(short, long)]
    pub move_mode: bool,
}

fn parse_opacity(s: &str) -> Result<f32, String> {
    let opacity: f32 = s.parse().map_err(|_| format!("invalid opacity value: {s}"))?;
    if !(MIN_OPACITY..=1.0).contains(&opacity) {
        return Err(format!("opacity must be between {MIN_OPACITY} and 1.0"));
    }
    Ok(opacity)
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["simple-overlay"]).unwrap();
        assert_eq!(args.image, None);
        assert_eq!(args.opacity, 1.0);
        assert!(!args.move_mode);
    }

    #[test]
    fn image_and_flags() {
        let args =
            Args::try_parse_from(["simple-overlay", "ref.png", "--opacity", "0.5", "-m"]).unwrap();
        assert_eq!(args.image, Some(PathBuf::from("ref.png")));
        assert_eq!(args.opacity, 0.5);
        assert!(args.move_mode);
    }

    #[test]
    fn opacity_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["simple-overlay", "-o", "0.05"]).is_err());
        assert!(Args::try_parse_from(["simple-overlay", "-o", "1.5"]).is_err());
        assert!(Args::try_parse_from(["simple-overlay", "-o", "abc"]).is_err());
    }
}
