use board::{Axis, Viewport};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Note-board API base URL
    #[arg(long, env = "BOARD_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stored value for a click offset
    #[command(allow_negative_numbers = true)]
    Encode { pixel: f64, dimension: f64 },

    /// Pixel offset of a stored value on a canvas side
    #[command(allow_negative_numbers = true)]
    Decode {
        stored: i64,

        dimension: f64,

        #[arg(long, value_enum, default_value_t = AxisArg::X)]
        axis: AxisArg,
    },

    /// Audit every tree a user joined
    User {
        user_id: u64,

        #[arg(long, default_value_t = 660.0)]
        width: f64,

        #[arg(long, default_value_t = 860.0)]
        height: f64,

        #[arg(long)]
        verbose: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AxisArg {
    X,
    Y,
}

impl From<AxisArg> for Axis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::X => Axis::X,
            AxisArg::Y => Axis::Y,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    match args.command {
        Command::Encode { pixel, dimension } => {
            println!("{}", board::encode(pixel, dimension));
        }
        Command::Decode {
            stored,
            dimension,
            axis,
        } => {
            println!("{}", inspect::describe(stored, dimension, axis.into()));
        }
        Command::User {
            user_id,
            width,
            height,
            verbose,
        } => {
            let viewport = Viewport::new(width, height);
            inspect::audit_user(&args.api_url, user_id, viewport, verbose).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_negative_encode() {
        let args = Args::try_parse_from(["inspect", "encode", "-50", "660"]).unwrap();

        assert!(matches!(
            args.command,
            Command::Encode { pixel, dimension } if pixel == -50.0 && dimension == 660.0
        ));
    }

    #[test]
    fn test_negative_decode() {
        let args =
            Args::try_parse_from(["inspect", "decode", "-20", "860", "--axis", "y"]).unwrap();

        assert!(matches!(
            args.command,
            Command::Decode { stored: -20, dimension, axis: AxisArg::Y } if dimension == 860.0
        ));
    }

    #[test]
    fn test_user_defaults() {
        let args = Args::try_parse_from(["inspect", "--api-url", "http://api.local", "user", "4"])
            .unwrap();

        assert_eq!(args.api_url, "http://api.local");
        assert!(matches!(
            args.command,
            Command::User { user_id: 4, width, height, verbose: false }
                if width == 660.0 && height == 860.0
        ));
    }
}
