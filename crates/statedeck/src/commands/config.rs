use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;
use crate::engine::settings::EngineSettings;

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            let path = config.save()?;
            println!(
                "{} {} = {} ({})",
                "Set".green(),
                key.bold(),
                value,
                path.display().to_string().dimmed()
            );
            Ok(())
        }
    }
}

fn show() -> anyhow::Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    let exists = path.exists();

    println!("{} {}", "Config file:".bold(), path.display());
    if !exists {
        println!("  {}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let theme = config.theme().unwrap_or("dark");
    println!("{}", "defaults".bold());
    println!("  theme: {theme}");
    println!();

    print_settings(&config.settings());
    Ok(())
}

fn print_settings(settings: &EngineSettings) {
    let t = &settings.timing;
    println!("{}", "timing".bold());
    println!("  key_hold_ms: {}", t.key_hold_ms);
    println!("  fast_flip_ms: {}", t.fast_flip_ms);
    println!("  autoplay_ms: {}", t.autoplay_ms);
    println!("  progress_hide_ms: {}", t.progress_hide_ms);
    println!("  buttons_hide_ms: {}", t.buttons_hide_ms);
    println!("  buttons_leave_ms: {}", t.buttons_leave_ms);
    match t.note_hide_ms {
        Some(ms) => println!("  note_hide: {ms}"),
        None => println!("  note_hide: sticky"),
    }
    println!();

    let i = &settings.input;
    println!("{}", "input".bold());
    println!("  click_zone_width: {}", i.click_zone_width);
    println!("  edge_threshold: {}", i.edge_threshold);
    println!("  swipe_threshold: {}", i.swipe_threshold);
    println!("  stick_press: {}", i.stick_press);
    println!("  stick_release: {}", i.stick_release);
}
