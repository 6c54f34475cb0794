use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "foodee",
    about = "Recognise a food ingredient in a photo and list matching recipes",
    long_about = "
Foodee - ingredient recognition and recipe lookup

Runs the same detector and recipe store as the desktop window, without the window.
Model, label and database locations come from the config file
(<config dir>/foodee/config.json unless --config is given).

Example Usage:
  # What ingredient is in this photo?
  foodee detect ~/Pictures/tomato.jpg

  # Recipes that use an ingredient (canonical, case-sensitive name)
  foodee recipes Tomato

  # Both in one go
  foodee lookup ~/Pictures/tomato.jpg --verbose"
)]
pub struct Args {
    /// Config file to use instead of the default location
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect the ingredient in an image
    Detect {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
    /// List recipes that use an ingredient
    Recipes {
        #[arg(value_name = "INGREDIENT")]
        ingredient: String,
    },
    /// Detect the ingredient in an image and list its recipes
    Lookup {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup_with_global_flags() {
        let args = Args::try_parse_from(["foodee", "lookup", "tomato.jpg", "-v", "--config", "c.json"])
            .unwrap();
        assert!(args.verbose);
        assert_eq!(args.config_file, Some(PathBuf::from("c.json")));
        assert!(matches!(args.command, Command::Lookup { ref image } if image == &PathBuf::from("tomato.jpg")));
    }

    #[test]
    fn test_recipes_requires_ingredient() {
        assert!(Args::try_parse_from(["foodee", "recipes"]).is_err());
        let args = Args::try_parse_from(["foodee", "recipes", "Tomato"]).unwrap();
        assert!(matches!(args.command, Command::Recipes { ref ingredient } if ingredient == "Tomato"));
    }

    #[test]
    fn test_command_is_required() {
        assert!(Args::try_parse_from(["foodee"]).is_err());
    }
}
