use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use prettytable::{format, Cell, Row, Table};
use std::path::Path;
use std::time::Instant;

use foodee::cli::{Args, Command};
use foodee::utils::{create_spinner, format_duration, has_image_extension, warn_println};
use foodee::{
    build_context, AppConfig, AppContext, DetectionResult, MessageId, Recipe,
};

fn main() -> Result<()> {
    let args = Args::parse();
    foodee::logging::init_stderr_logging(args.verbose)?;

    let config = AppConfig::load(args.config_file.as_deref())?;
    let context = build_context(&config).context("Failed to set up detector and recipe store")?;

    match &args.command {
        Command::Detect { image } => {
            detect(&context, image)?;
        }
        Command::Recipes { ingredient } => {
            print_recipes(&context, ingredient)?;
        }
        Command::Lookup { image } => {
            if let DetectionResult::Label(name) = detect(&context, image)? {
                println!();
                print_recipes(&context, &name)?;
            }
        }
    }

    Ok(())
}

fn detect(context: &AppContext, image: &Path) -> Result<DetectionResult> {
    if !image.is_file() {
        return Err(anyhow::anyhow!("Image does not exist: {}", image.display()));
    }
    if !has_image_extension(image) {
        warn_println(&format!(
            "{} does not look like an image, trying anyway",
            image.display()
        ));
    }

    let start = Instant::now();
    let spinner = create_spinner(context.messages.get(MessageId::LoadingCaption));
    let result = context.detector.detect(image);
    spinner.finish_and_clear();
    let result = result.with_context(|| format!("Failed to analyze {}", image.display()))?;

    match &result {
        DetectionResult::Label(name) => println!(
            "{} {} {}",
            style(context.messages.get(MessageId::ScannedObjectLabel)).bold(),
            style(name).bold().green(),
            style(format!("({})", format_duration(start.elapsed()))).dim()
        ),
        DetectionResult::NotFound => warn_println(context.messages.get(MessageId::WarningBody)),
    }

    Ok(result)
}

fn print_recipes(context: &AppContext, ingredient: &str) -> Result<()> {
    let recipes = context
        .repository
        .find_by_ingredient(ingredient)
        .with_context(|| {
            format!(
                "Failed to read recipes from {}",
                context.repository.database_path().display()
            )
        })?;

    if recipes.is_empty() {
        warn_println(context.messages.get(MessageId::NoRecipesBody));
        return Ok(());
    }

    recipe_table(context, &recipes).printstd();
    Ok(())
}

fn recipe_table(context: &AppContext, recipes: &[Recipe]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![
        Cell::new("#").style_spec("b"),
        Cell::new("Recipe").style_spec("b"),
        Cell::new(context.messages.get(MessageId::IngredientsHeading)).style_spec("b"),
        Cell::new(context.messages.get(MessageId::InstructionsHeading)).style_spec("b"),
    ]));

    for (index, recipe) in recipes.iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&(index + 1).to_string()),
            Cell::new(&recipe.title).style_spec("Fg"),
            Cell::new(&recipe.ingredients_summary),
            Cell::new(&recipe.instructions),
        ]));
    }

    table
}
