use calorie_core::*;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "calorie")]
#[command(about = "Calorie tracking against a daily target", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's diary and progress against the target (default)
    Today,

    /// Show or set the nutritional profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Log a food entry manually
    Add {
        /// Short label, e.g. "Chicken salad"
        #[arg(long)]
        name: String,

        #[arg(long)]
        calories: f64,

        /// Protein in grams
        #[arg(long, default_value_t = 0.0)]
        protein: f64,

        /// Carbohydrates in grams
        #[arg(long, default_value_t = 0.0)]
        carbs: f64,

        /// Fats in grams
        #[arg(long, default_value_t = 0.0)]
        fats: f64,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        image_url: Option<String>,
    },

    /// Delete a logged entry by id
    Delete {
        id: String,
    },

    /// Estimate a meal from a photo with the configured analyzer
    Scan {
        /// Image file to analyze
        image: PathBuf,

        /// Extra hints for the analyzer (e.g. "large portion")
        #[arg(long)]
        context: Option<String>,

        /// Save the estimate without asking for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Show the current profile and targets
    Show,

    /// Create or replace the profile
    Set(ProfileArgs),
}

#[derive(Args)]
struct ProfileArgs {
    /// Age in years
    #[arg(long)]
    age: u32,

    /// male or female
    #[arg(long)]
    gender: String,

    /// Height in centimeters
    #[arg(long)]
    height: f64,

    /// Weight in kilograms
    #[arg(long)]
    weight: f64,

    /// sedentary, light, moderate, active or very-active
    #[arg(long)]
    activity: String,

    /// maintain, lose-mild, lose-normal or lose-extreme
    #[arg(long)]
    goal: String,
}

impl ProfileArgs {
    fn to_input(&self) -> Result<ProfileInput> {
        Ok(ProfileInput {
            age: self.age,
            gender: self.gender.parse()?,
            height_cm: self.height,
            weight_kg: self.weight,
            activity: self.activity.parse()?,
            goal: self.goal.parse()?,
        })
    }
}

fn main() -> Result<()> {
    // Initialize logging
    calorie_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    let mut app = App::open(FileStore::new(&data_dir), config.targets.clone());

    match cli.command {
        Some(Commands::Today) | None => cmd_today(&mut app),
        Some(Commands::Profile { action }) => match action {
            ProfileCommand::Show => cmd_profile_show(&mut app),
            ProfileCommand::Set(args) => cmd_profile_set(&mut app, &args),
        },
        Some(Commands::Add {
            name,
            calories,
            protein,
            carbs,
            fats,
            description,
            image_url,
        }) => cmd_add(
            &mut app,
            FoodDraft {
                name,
                calories,
                protein,
                carbs,
                fats,
                description,
                image_url,
            },
        ),
        Some(Commands::Delete { id }) => cmd_delete(&mut app, &id),
        Some(Commands::Scan {
            image,
            context,
            yes,
        }) => cmd_scan(&mut app, &config, &image, context.as_deref(), yes),
    }
}

fn cmd_today(app: &mut App<FileStore>) -> Result<()> {
    app.navigate(View::Dashboard);
    if app.screen() == Screen::Onboarding {
        display_onboarding();
        return Ok(());
    }

    display_header(app);

    let summary = app.today_summary();
    let today = Local::now().date_naive();
    let entries: Vec<_> = app.log().entries_on(today, Local).collect();

    if entries.is_empty() {
        println!("  No food logged today.");
    } else {
        for entry in entries {
            let time = entry
                .logged_at()
                .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".into());
            println!(
                "  {}  {:<24} {:>6.0} kcal   P {:.0}g  C {:.0}g  F {:.0}g",
                time, entry.name, entry.calories, entry.protein, entry.carbs, entry.fats
            );
            println!("         id: {}", entry.id);
        }
    }

    println!();
    display_summary(&summary);
    Ok(())
}

fn cmd_profile_show(app: &mut App<FileStore>) -> Result<()> {
    app.navigate(View::Profile);
    if app.screen() == Screen::Onboarding {
        display_onboarding();
        return Ok(());
    }

    display_header(app);
    let Some(profile) = app.profile() else {
        return Ok(());
    };
    println!("  Age:       {}", profile.age);
    println!("  Gender:    {}", profile.gender);
    println!("  Height:    {} cm", profile.height);
    println!("  Weight:    {} kg", profile.weight);
    println!("  Activity:  {}", profile.activity);
    println!("  Goal:      {}", profile.goal);
    println!();
    println!("  TDEE:      {:.0} kcal/day", profile.tdee);
    println!("  Target:    {:.0} kcal/day", profile.target_calories);
    Ok(())
}

fn cmd_profile_set(app: &mut App<FileStore>, args: &ProfileArgs) -> Result<()> {
    app.navigate(View::Profile);
    let input = args.to_input()?;
    let profile = app.save_profile(&input)?;

    println!("✓ Profile saved!");
    println!("  TDEE:   {:.0} kcal/day", profile.tdee);
    println!("  Target: {:.0} kcal/day", profile.target_calories);
    Ok(())
}

fn cmd_add(app: &mut App<FileStore>, draft: FoodDraft) -> Result<()> {
    app.navigate(View::Scanner);
    if app.screen() == Screen::Onboarding {
        display_onboarding();
        return Ok(());
    }

    let entry = app.add_draft(draft)?;
    println!("✓ Logged {} ({:.0} kcal)", entry.name, entry.calories);
    println!("  id: {}", entry.id);
    Ok(())
}

fn cmd_delete(app: &mut App<FileStore>, id: &str) -> Result<()> {
    app.navigate(View::Dashboard);
    if app.screen() == Screen::Onboarding {
        display_onboarding();
        return Ok(());
    }

    let existed = app.log().get(id).is_some();
    app.delete_food(id);
    if existed {
        println!("✓ Deleted entry {}", id);
    } else {
        println!("No entry with id {} - nothing to delete.", id);
    }
    Ok(())
}

fn cmd_scan(
    app: &mut App<FileStore>,
    config: &Config,
    image: &Path,
    context: Option<&str>,
    yes: bool,
) -> Result<()> {
    app.navigate(View::Scanner);
    if app.screen() == Screen::Onboarding {
        display_onboarding();
        return Ok(());
    }

    let analyzer = CommandAnalyzer::from_config(&config.analysis).ok_or_else(|| {
        Error::Config("no analyzer configured; set [analysis] command in config.toml".into())
    })?;
    let bytes = std::fs::read(image)?;

    println!("Analyzing {} ...", image.display());
    let mut session = ScanSession::new();
    let outcome = session.analyze(
        &analyzer,
        &bytes,
        context,
        Some(image.display().to_string()),
    );

    match outcome {
        Ok(ScanOutcome::Draft(draft)) => {
            display_draft(&draft);
            if !yes && !prompt_confirm()? {
                session.reset();
                println!("Discarded.");
                return Ok(());
            }
            if let Some(draft) = session.take_draft() {
                let entry = app.add_draft(draft)?;
                println!("✓ Logged {} ({:.0} kcal)", entry.name, entry.calories);
                println!("  id: {}", entry.id);
            }
            Ok(())
        }
        Ok(ScanOutcome::NotFood) => {
            println!("Could not identify any food in this image.");
            println!("Try another photo, or log it manually with `calorie add`.");
            Ok(())
        }
        Err(e) => {
            eprintln!("Analysis failed. Retry, or log the food manually with `calorie add`.");
            Err(e)
        }
    }
}

fn display_onboarding() {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  Welcome");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  To get started we need to calculate your calorie target.");
    println!();
    println!("  calorie profile set --age <YEARS> --gender <male|female> \\");
    println!("      --height <CM> --weight <KG> \\");
    println!("      --activity <sedentary|light|moderate|active|very-active> \\");
    println!("      --goal <maintain|lose-mild|lose-normal|lose-extreme>");
    println!();
}

fn display_header(app: &App<FileStore>) {
    println!("\n╭─────────────────────────────────────────╮");
    match app.header_target() {
        Some(target) => println!("│  CalorieAI · Daily target {} kcal", target),
        None => println!("│  CalorieAI"),
    }
    println!("╰─────────────────────────────────────────╯");
    println!();
}

fn display_summary(summary: &DailySummary) {
    println!("  Consumed:  {:.0} kcal", summary.calories);
    if let Some(target) = summary.target {
        println!("  Target:    {:.0} kcal", target);
    }
    if let Some(remaining) = summary.remaining() {
        if summary.is_over_target() {
            println!("  Over by:   {:.0} kcal", -remaining);
        } else {
            println!("  Remaining: {:.0} kcal", remaining);
        }
    }
    if let Some(progress) = summary.progress() {
        println!("  Progress:  {:.0}%", progress * 100.0);
    }
    println!(
        "  Macros:    P {:.0}g  C {:.0}g  F {:.0}g",
        summary.protein, summary.carbs, summary.fats
    );
}

fn display_draft(draft: &FoodDraft) {
    println!();
    println!("  {}", draft.name);
    println!("  ~{:.0} kcal", draft.calories);
    println!(
        "  P {:.0}g  C {:.0}g  F {:.0}g",
        draft.protein, draft.carbs, draft.fats
    );
    if !draft.description.is_empty() {
        println!("  {}", draft.description);
    }
    println!();
}

fn prompt_confirm() -> Result<bool> {
    print!("Save this entry? [Y/n] > ");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        // stdin closed; nothing was confirmed
        println!();
        return Ok(false);
    }

    Ok(!matches!(input.trim().to_lowercase().as_str(), "n" | "no"))
}
