use anyhow::Result;
use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use dialoguer::{Confirm, Input, MultiSelect, Select};
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;

use botanica::core::Config;
use botanica::features::auth::{AuthFlow, AuthStep, User};
use botanica::features::dashboard;
use botanica::features::encyclopedia;
use botanica::features::garden::{self, GardenStore};
use botanica::features::guide::GuideChat;
use botanica::features::image_gen::ImageGenerator;
use botanica::features::recommendations::{
    self, RecommendationWizard, SlotImage, WizardStep, FLOWERING_CHOICES, SIZE_CHOICES,
    TYPE_CHOICES,
};
use botanica::features::reminders::{ConsoleNotifier, ReminderCenter, ReminderDraft};
use botanica::features::warnings;
use botanica::oracle::{OracleClient, PlantOracle};
use botanica::storage::SnapshotStore;
use botanica::Plant;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    // The openai crate reads the key from env vars, not from our config.
    // Set both names for compatibility.
    std::env::set_var("OPENAI_API_KEY", &config.openai_api_key);
    std::env::set_var("OPENAI_KEY", &config.openai_api_key);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Botanica...");

    let store = SnapshotStore::new(&config.data_dir);
    let oracle: Arc<dyn PlantOracle> = Arc::new(OracleClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.research_model.clone(),
    ));
    let images = ImageGenerator::new(config.openai_api_key.clone(), store.clone());
    let mut garden = GardenStore::load(store.clone());
    let reminders = ReminderCenter::new(store.clone(), Arc::new(ConsoleNotifier)).await;

    info!(
        "Loaded {} plants and {} reminders from {}",
        garden.len(),
        reminders.reminders().await.len(),
        config.data_dir.display()
    );

    println!("🌿 Botanica: your AI companion for mindful gardening.\n");

    let user = run_auth()?;
    info!("Signed in as {}", user.username);

    loop {
        let views = [
            "Dashboard",
            "My Garden",
            "Reminders",
            "For You",
            "Discover",
            "Warnings",
            "AI Guide",
            "Exit",
        ];
        let choice = Select::new()
            .with_prompt("Where to?")
            .items(&views)
            .default(0)
            .interact()?;

        match choice {
            0 => dashboard_view(&user, &garden, &reminders, oracle.as_ref()).await,
            1 => {
                if let Some(query) = garden_view(&mut garden, oracle.as_ref(), &images).await? {
                    discover_view(oracle.as_ref(), &images, Some(query)).await?;
                }
            }
            2 => reminders_view(&garden, &reminders).await?,
            3 => recommendations_view(&user, &mut garden, oracle.as_ref(), &images).await?,
            4 => discover_view(oracle.as_ref(), &images, None).await?,
            5 => warnings_view(&user, oracle.as_ref()).await?,
            6 => guide_view(&user, Arc::clone(&oracle)).await?,
            _ => break,
        }
    }

    reminders.shutdown().await;
    info!("Goodbye!");
    Ok(())
}

/// Mock phone/OTP sign-in, re-prompting on each validation error.
fn run_auth() -> Result<User> {
    let mut flow = AuthFlow::new();

    loop {
        match flow.step() {
            AuthStep::Phone => {
                let phone: String = Input::new()
                    .with_prompt("Phone number (10 digits)")
                    .interact_text()?;
                if let Err(e) = flow.submit_phone(&phone) {
                    println!("{e}");
                }
            }
            AuthStep::Otp => {
                let otp: String = Input::new()
                    .with_prompt("OTP (hint: use 123456)")
                    .interact_text()?;
                if let Err(e) = flow.submit_otp(&otp) {
                    println!("{e}");
                }
            }
            AuthStep::Profile => {
                let username: String = Input::new().with_prompt("Username").interact_text()?;
                let condition: String = Input::new()
                    .with_prompt("Medical condition (for safe recommendations)")
                    .interact_text()?;
                match flow.submit_profile(&username, &condition) {
                    Ok(user) => return Ok(user),
                    Err(e) => println!("{e}"),
                }
            }
        }
    }
}

async fn dashboard_view(
    user: &User,
    garden: &GardenStore,
    reminders: &ReminderCenter,
    oracle: &dyn PlantOracle,
) {
    println!("\nWelcome back, {}!", user.username);

    let tip = dashboard::health_tip(oracle, user).await;
    println!("💡 A tip for you: {tip}\n");

    let summary = dashboard::summarize(user, garden, reminders.upcoming().await);
    if summary.plant_count > 0 {
        println!("You have {} plant(s) thriving!", summary.plant_count);
    } else {
        println!("Your garden is waiting. Add your first plant!");
    }
    match summary.upcoming {
        Some(reminder) => println!(
            "⏰ Upcoming: {} ({}) at {}",
            reminder.message,
            reminder.plant_name.as_deref().unwrap_or("General"),
            reminder.time.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        ),
        None => println!("No upcoming reminders."),
    }
    println!();
}

fn print_plant(plant: &Plant) {
    println!("• {}", plant.display_name());
    println!("  Lifespan: {}", plant.life_span);
    println!("  Seasons: {}", plant.seasonal_info);
    println!("  Uses: {}", plant.useful_info);
    println!("  Environment: {}", plant.environment);
    println!("  Watering: {}", plant.watering_frequency);
    if let Some(explanation) = &plant.safety_explanation {
        let verdict = if plant.is_safe == Some(true) { "✅" } else { "⚠️" };
        println!("  Safety: {verdict} {explanation}");
    }
    if !plant.image_ref.is_empty() {
        println!("  Image: {}", plant.image_ref);
    }
}

/// My Garden view. Returns a plant name if the user asked to learn more
/// about one (handled by the Discover view).
async fn garden_view(
    garden: &mut GardenStore,
    oracle: &dyn PlantOracle,
    images: &ImageGenerator,
) -> Result<Option<String>> {
    loop {
        let actions = [
            "List my plants",
            "Identify from photo",
            "Add by name",
            "Learn more about a plant",
            "Back",
        ];
        let choice = Select::new()
            .with_prompt("My Garden")
            .items(&actions)
            .default(0)
            .interact()?;

        match choice {
            0 => {
                if garden.is_empty() {
                    println!("Your garden is empty. Add your first plant!");
                } else {
                    for plant in garden.plants() {
                        print_plant(plant);
                    }
                }
            }
            1 => {
                let path: String = Input::new()
                    .with_prompt("Path to a photo of the plant")
                    .interact_text()?;
                let bytes = match std::fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        println!("Could not read {path}: {e}");
                        continue;
                    }
                };
                use base64::Engine as _;
                let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

                println!("Identifying...");
                match garden::identify_candidate(oracle, &encoded, path).await {
                    Ok(candidate) => confirm_add(garden, candidate)?,
                    Err(e) => {
                        error!("Identification failed: {e:#}");
                        println!("Could not identify the plant. Please try another image.");
                    }
                }
            }
            2 => {
                let name: String = Input::new()
                    .with_prompt("Plant name (e.g. 'Monstera Deliciosa')")
                    .interact_text()?;
                if name.trim().is_empty() {
                    continue;
                }
                println!("Looking up \"{name}\"...");
                match garden::candidate_by_name(oracle, images, name.trim()).await {
                    Ok(candidate) => confirm_add(garden, candidate)?,
                    Err(e) => {
                        error!("Name lookup failed: {e:#}");
                        println!(
                            "Could not find information for \"{name}\". Please check the spelling."
                        );
                    }
                }
            }
            3 => {
                if garden.is_empty() {
                    println!("Nothing to learn about yet.");
                    continue;
                }
                let names: Vec<String> =
                    garden.plants().iter().map(|p| p.display_name()).collect();
                let picked = Select::new()
                    .with_prompt("Learn more about")
                    .items(&names)
                    .default(0)
                    .interact()?;
                return Ok(Some(garden.plants()[picked].name.clone()));
            }
            _ => return Ok(None),
        }
    }
}

/// Show a found candidate and add it to the garden on confirmation.
fn confirm_add(garden: &mut GardenStore, mut candidate: Plant) -> Result<()> {
    println!("Found a plant! Is this it?");
    print_plant(&candidate);

    if !Confirm::new()
        .with_prompt("Add to My Garden?")
        .default(true)
        .interact()?
    {
        return Ok(());
    }

    let nickname: String = Input::new()
        .with_prompt("Give it a nickname (optional)")
        .allow_empty(true)
        .interact_text()?;
    let nickname = nickname.trim();
    if !nickname.is_empty() {
        candidate.nickname = Some(nickname.to_string());
    }

    let name = candidate.name.clone();
    if garden.add_plant(candidate) {
        println!("Added {name} to your garden. 🌱");
    } else {
        println!("{name} is already in your garden.");
    }
    Ok(())
}

async fn reminders_view(garden: &GardenStore, center: &ReminderCenter) -> Result<()> {
    loop {
        let actions = ["List reminders", "New reminder", "Delete a reminder", "Back"];
        let choice = Select::new()
            .with_prompt("Reminders & Notes")
            .items(&actions)
            .default(0)
            .interact()?;

        match choice {
            0 => {
                let reminders = center.reminders().await;
                if reminders.is_empty() {
                    println!("No reminders set.");
                }
                for reminder in reminders {
                    println!(
                        "• {} | {} | {}",
                        reminder.message,
                        reminder.plant_name.as_deref().unwrap_or("General"),
                        reminder.time.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    );
                }
            }
            1 => {
                let message: String = Input::new()
                    .with_prompt("Message (e.g. 'Water the roses')")
                    .interact_text()?;

                let mut plant_choices = vec!["General Note".to_string()];
                plant_choices.extend(garden.plants().iter().map(|p| p.display_name()));
                let picked = Select::new()
                    .with_prompt("For plant")
                    .items(&plant_choices)
                    .default(0)
                    .interact()?;
                let (plant_id, plant_name) = if picked == 0 {
                    (None, Some("General Note".to_string()))
                } else {
                    let plant = &garden.plants()[picked - 1];
                    (Some(plant.id.clone()), Some(plant.display_name()))
                };

                let raw_time: String = Input::new()
                    .with_prompt("Time (YYYY-MM-DD HH:MM, local)")
                    .interact_text()?;
                let Some(time) = parse_local_time(&raw_time) else {
                    println!("Could not read that time. Use the form 2026-08-07 18:30.");
                    continue;
                };

                match center
                    .add(ReminderDraft {
                        message,
                        time,
                        plant_id,
                        plant_name,
                    })
                    .await
                {
                    Ok(reminder) => println!(
                        "⏰ Set for {}.",
                        reminder.time.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                    ),
                    Err(e) => println!("{e}"),
                }
            }
            2 => {
                let reminders = center.reminders().await;
                if reminders.is_empty() {
                    println!("No reminders set.");
                    continue;
                }
                let labels: Vec<String> = reminders
                    .iter()
                    .map(|r| {
                        format!(
                            "{} ({})",
                            r.message,
                            r.time.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                        )
                    })
                    .collect();
                let picked = Select::new()
                    .with_prompt("Delete which?")
                    .items(&labels)
                    .default(0)
                    .interact()?;
                center.delete(&reminders[picked].id).await;
                println!("Deleted.");
            }
            _ => return Ok(()),
        }
    }
}

/// Interpret user input as a local wall-clock time.
fn parse_local_time(raw: &str) -> Option<chrono::DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M").ok()?;
    let local = Local.from_local_datetime(&naive).single()?;
    Some(local.with_timezone(&Utc))
}

async fn recommendations_view(
    user: &User,
    garden: &mut GardenStore,
    oracle: &dyn PlantOracle,
    images: &ImageGenerator,
) -> Result<()> {
    let mut wizard = RecommendationWizard::new();

    println!("Let's find plants that are right for you.");
    let picked = Select::new()
        .with_prompt("Choose a plant type")
        .items(TYPE_CHOICES)
        .default(0)
        .interact()?;
    wizard.choose_type(TYPE_CHOICES[picked]);

    let picked = Select::new()
        .with_prompt("Flowering or non-flowering?")
        .items(FLOWERING_CHOICES)
        .default(0)
        .interact()?;
    wizard.choose_flowering(FLOWERING_CHOICES[picked]);

    let picked = Select::new()
        .with_prompt("What size are you looking for?")
        .items(SIZE_CHOICES)
        .default(0)
        .interact()?;
    wizard.choose_size(SIZE_CHOICES[picked]);

    if wizard.next().is_err() || wizard.step() != WizardStep::Results {
        println!("Please answer every question first.");
        return Ok(());
    }

    println!("Finding the perfect plants for you...");
    let mut set =
        match recommendations::fetch(oracle, &user.medical_condition, wizard.preferences()).await {
            Ok(set) => set,
            Err(e) => {
                error!("Recommendations failed: {e:#}");
                println!("Could not fetch recommendations. Please try again.");
                return Ok(());
            }
        };
    if set.is_empty() {
        println!("No matches this time. Try different preferences.");
        return Ok(());
    }

    println!("Generating portraits for {} plants...", set.len());
    recommendations::resolve_images(&mut set, images).await;

    println!("\nHere are your recommendations!");
    for slot in set.slots() {
        print_plant(&slot.plant);
        if slot.image == SlotImage::Failed {
            println!("  (no portrait this time)");
        }
    }

    let names: Vec<String> = set.slots().iter().map(|s| s.plant.name.clone()).collect();
    let chosen = MultiSelect::new()
        .with_prompt("Add any to your garden? (space to pick, enter to confirm)")
        .items(&names)
        .interact()?;
    for index in chosen {
        let plant = set.slots()[index].plant.clone();
        let name = plant.name.clone();
        if garden.add_plant(plant) {
            println!("Added {name}. 🌱");
        } else {
            println!("{name} is already in your garden.");
        }
    }
    Ok(())
}

async fn discover_view(
    oracle: &dyn PlantOracle,
    images: &ImageGenerator,
    initial_query: Option<String>,
) -> Result<()> {
    let query = match initial_query {
        Some(query) => query,
        None => Input::new()
            .with_prompt("Search (e.g. 'Rose stem' or 'Photosynthesis')")
            .interact_text()?,
    };
    if query.trim().is_empty() {
        return Ok(());
    }

    println!("Searching for \"{query}\"...");
    match encyclopedia::lookup(oracle, images, query.trim()).await {
        Ok(page) => {
            if let Some(image_ref) = &page.image_ref {
                println!("🖼  {image_ref}");
            }
            println!("\n{}\n", page.description);
        }
        Err(e) => {
            error!("Encyclopedia lookup failed: {e:#}");
            println!("Could not fetch information. Please try again.");
        }
    }
    Ok(())
}

async fn warnings_view(user: &User, oracle: &dyn PlantOracle) -> Result<()> {
    let query: String = Input::new()
        .with_prompt("Filter plants to avoid (leave empty for the full list)")
        .allow_empty(true)
        .interact_text()?;

    println!("Checking plants to avoid with {}...", user.medical_condition);
    match warnings::fetch(oracle, &user.medical_condition, Some(query.as_str())).await {
        Ok(plants) if plants.is_empty() => println!("Nothing matched."),
        Ok(plants) => {
            for plant in plants {
                println!("⚠️  {}", plant.name);
                if !plant.common_names.is_empty() {
                    println!("    Also known as: {}", plant.common_names.join(", "));
                }
                println!("    {}", plant.reason);
            }
        }
        Err(e) => {
            error!("Warnings fetch failed: {e:#}");
            println!("Could not fetch the warning list. Please try again.");
        }
    }
    Ok(())
}

async fn guide_view(user: &User, oracle: Arc<dyn PlantOracle>) -> Result<()> {
    let mut chat = GuideChat::start(oracle, user);
    if let Some(greeting) = chat.history().first() {
        println!("AI: {}", greeting.text);
    }
    println!("(type 'back' to leave the chat)");

    loop {
        let line: String = Input::new().with_prompt("You").interact_text()?;
        let line = line.trim().to_string();
        if line.eq_ignore_ascii_case("back") || line.eq_ignore_ascii_case("exit") {
            return Ok(());
        }
        if line.is_empty() {
            continue;
        }

        match chat.send(&line).await {
            Ok(reply) => println!("AI: {reply}"),
            Err(e) => {
                error!("Guide reply failed: {e:#}");
                println!(
                    "AI: I seem to be having trouble connecting. Please check your connection \
                     and try again."
                );
            }
        }
    }
}
