use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{config, DirectoryClient, UserDirectory};
use shared::{domain::UserId, protocol::UserDraft};

#[derive(Parser, Debug)]
#[command(about = "Command-line access to the users directory API")]
struct Args {
    /// Overrides the base URL from client.toml / environment.
    #[arg(long)]
    api_base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all users.
    List,
    /// Print the identifiers known to the enumeration endpoint.
    Ids,
    /// Show one user as JSON.
    Show { id: i64 },
    /// Create a user. All four fields are required.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        tel: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        intro: String,
    },
    /// Update a user; unspecified fields keep their stored values.
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        tel: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        intro: Option<String>,
    },
    /// Delete a user.
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(url) = args.api_base_url {
        settings.api_base_url = url;
    }
    let client = DirectoryClient::from_settings(&settings);

    match args.command {
        Command::List => {
            let users = client.list_users().await?;
            if users.is_empty() {
                println!("No users found");
                return Ok(());
            }
            for user in users {
                println!("{}\t{}\t{}\t{}", user.id, user.name, user.tel, user.address);
            }
        }
        Command::Ids => {
            let users = client.enumerate_users().await?;
            for user in users {
                println!("{}", user.id);
            }
        }
        Command::Show { id } => {
            let user = client.user_by_id(UserId(id)).await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::Create {
            name,
            tel,
            address,
            intro,
        } => {
            let draft = UserDraft {
                name,
                tel,
                address,
                intro,
            };
            let response = client.create_user(&draft).await?;
            if !response.success {
                bail!("Failed to create user.");
            }
            println!("User created successfully!");
        }
        Command::Update {
            id,
            name,
            tel,
            address,
            intro,
        } => {
            let current = client.user_by_id(UserId(id)).await?;
            let draft = UserDraft {
                name: name.unwrap_or(current.name),
                tel: tel.unwrap_or(current.tel),
                address: address.unwrap_or(current.address),
                intro: intro.unwrap_or(current.intro),
            };
            client.update_user(UserId(id), &draft).await?;
            println!("User updated successfully!");
        }
        Command::Delete { id } => {
            client.delete_user(UserId(id)).await?;
            println!("User deleted successfully");
        }
    }

    Ok(())
}
