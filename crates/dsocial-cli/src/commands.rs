use std::fs;

use anyhow::{anyhow, Context};
use colored::Colorize;
use dsocial_feed::DataUrl;
use dsocial_refs::parse_route;
use dsocial_sdk::{Config, ContentHash, Session};
use serde_json::{json, Value};
use tracing::debug;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        format,
        config: config_path,
        gateway,
        ..
    } = cli;

    let mut config = Config::discover(config_path.as_deref())?;
    if let Some(url) = gateway {
        config.gateway.url = url;
    }
    debug!(gateway = %config.gateway.url, state_dir = %config.state_dir.display(), "configuration resolved");

    match command {
        Command::Post(args) => cmd_post(&config, args, &format).await,
        Command::Feed(args) => cmd_feed(&config, args, &format).await,
        Command::Profile(args) => cmd_profile(&config, args, &format).await,
        Command::Show(args) => cmd_show(&config, args).await,
        Command::Config => cmd_config(&config, &format),
    }
}

fn parse_target(input: &str) -> anyhow::Result<ContentHash> {
    parse_route(input)?.ok_or_else(|| anyhow!("no profile hash in {input:?}"))
}

fn describe_image(image: &str) -> String {
    if image.is_empty() {
        return "no image".into();
    }
    match DataUrl::parse(image) {
        Ok(url) => format!("{}, {} bytes", url.mime, url.data.len()),
        Err(_) => "unreadable image".into(),
    }
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_post(config: &Config, args: PostArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut session = Session::from_config(config)?;
    session.open().await?;
    let published = session.publish_image(args.caption, &args.image).await?;

    match format {
        OutputFormat::Json => print_json(&json!({
            "post": published.post_hash,
            "profile": published.profile_hash,
            "next": published.post.next,
        })),
        OutputFormat::Text => {
            println!("{} Posted {}", "✓".green().bold(), published.post_hash.as_str().yellow());
            println!("  Profile: {}", published.profile_hash.to_fragment().cyan());
            match &published.post.next {
                Some(next) => println!("  Follows: {}", next.short().dimmed()),
                None => println!("  {}", "First post on this profile".dimmed()),
            }
            Ok(())
        }
    }
}

async fn cmd_feed(config: &Config, args: FeedArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut session = Session::from_config(config)?;
    match &args.profile {
        Some(target) => session.view(parse_target(target)?).await,
        None => session.open().await?,
    }
    if let Some(from) = &args.from {
        session.seek(ContentHash::parse(from)?).await;
    }

    let count = args.count.unwrap_or_else(|| session.page_size());
    session.fill(count).await;
    let (posts, next) = session.window(count);

    if let OutputFormat::Json = format {
        return print_json(&json!({
            "profile": session.profile_hash(),
            "posts": posts,
            "next": next,
            "interrupted": session.interrupted(),
        }));
    }

    match session.profile_hash() {
        Some(hash) => println!("Profile {}", hash.to_fragment().cyan().bold()),
        None if args.from.is_some() => {}
        None => {
            println!("No profile yet. Publish a post with {}.", "dsocial post".bold());
            return Ok(());
        }
    }
    if session.profile_hash().is_some() && session.profile().is_none() && args.from.is_none() {
        println!("{} Could not load this profile.", "✗".red().bold());
        return Ok(());
    }
    if posts.is_empty() {
        println!("No posts.");
    }
    for entry in posts {
        println!();
        println!("{}  {}", entry.hash.short().yellow(), entry.post.caption);
        println!("  {}", describe_image(&entry.post.image).dimmed());
    }
    if let Some(interruption) = session.interrupted() {
        println!();
        println!(
            "{} Stopped at {}: {}",
            "✗".red().bold(),
            interruption.hash.as_str().yellow(),
            interruption.reason
        );
    }
    if let Some(next) = next {
        println!();
        println!("More: {}", format!("dsocial feed --from {next}").bold());
    }
    Ok(())
}

async fn cmd_profile(config: &Config, args: ProfileArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut session = Session::from_config(config)?;
    match args.action {
        Some(ProfileAction::Use { target }) => {
            let hash = parse_target(&target)?;
            session.navigate(hash.clone()).await?;
            println!("Switched to profile {}", hash.to_fragment().cyan().bold());
            if session.profile().is_none() {
                println!("  {}", "Profile could not be loaded".red());
            }
            return Ok(());
        }
        Some(ProfileAction::Clear) => {
            session.clear()?;
            println!("{} Profile cleared", "✓".green());
            return Ok(());
        }
        None => session.open().await?,
    }

    if let OutputFormat::Json = format {
        return print_json(&json!({
            "hash": session.profile_hash(),
            "profile": session.profile(),
        }));
    }

    let Some(hash) = session.profile_hash() else {
        println!("No profile set.");
        return Ok(());
    };
    println!("Profile {}", hash.to_fragment().cyan().bold());
    match session.profile() {
        Some(profile) => {
            match &profile.most_recent_post {
                Some(head) => println!("  Latest post: {}", head.as_str().yellow()),
                None => println!("  {}", "No posts".dimmed()),
            }
            for (key, value) in &profile.extra {
                println!("  {key}: {value}");
            }
        }
        None => println!("  {}", "Profile could not be loaded".red()),
    }
    Ok(())
}

async fn cmd_show(config: &Config, args: ShowArgs) -> anyhow::Result<()> {
    let session = Session::from_config(config)?;
    let hash = ContentHash::parse(&args.hash)?;
    let value = session.fetch(&hash).await?;

    match args.save_image {
        Some(path) => {
            let image = value
                .get("image")
                .and_then(Value::as_str)
                .filter(|image| !image.is_empty())
                .ok_or_else(|| anyhow!("object {hash} has no image"))?;
            let url = DataUrl::parse(image)?;
            fs::write(&path, &url.data)
                .with_context(|| format!("writing {}", path.display()))?;
            println!(
                "{} Saved {} ({} bytes) to {}",
                "✓".green().bold(),
                url.mime,
                url.data.len(),
                path.display()
            );
            Ok(())
        }
        None => print_json(&value),
    }
}

fn cmd_config(config: &Config, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Text => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}
