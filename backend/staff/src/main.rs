use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use staff::{DEFAULT_SERVER, Operation, StaffClient};
use stock::{DisplayMode, GoalBasis, SellBound, customer_view, hold::HoldTiming, staff_view};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "SCOOP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    /// What caps a staged sale: "stock" or "above-target"
    #[arg(long, default_value = "above-target")]
    bound: SellBound,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every flavor card
    List,
    /// Set the initial stock of a flavor
    Setup { flavor: String, amount: u32 },
    /// Stage and confirm a sale
    Sell { flavor: String, count: u32 },
    /// Hold the + button for a while, then confirm what got staged
    Hold {
        flavor: String,

        /// How long the button stays down, in milliseconds
        #[arg(long, default_value_t = 1000)]
        millis: u64,
    },
    /// Undo a mistaken sale
    Correct { flavor: String, count: u32 },
    /// Add stock, or remove it with a negative delta
    Restock {
        flavor: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Set the reserve floor
    Target { flavor: String, target: u32 },
    /// Set the sold count directly
    Sold { flavor: String, sold: u32 },
    /// Show or replace the customer headline
    Headline { text: Option<String> },
    /// Show the customer display
    Display {
        #[arg(long, default_value = "count")]
        mode: DisplayMode,

        #[arg(long, default_value = "max")]
        basis: GoalBasis,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = StaffClient::new(&args.server)?;

    let (flavor, operation) = match args.command {
        Command::List => {
            for (name, item) in client.inventory().await? {
                println!("{name}: {}", staff_view(&item, args.bound));
            }
            return Ok(());
        }
        Command::Headline { text: Some(text) } => {
            client.set_headline(&text).await?;
            println!("Headline saved");
            return Ok(());
        }
        Command::Headline { text: None } => {
            println!("{}", client.headline().await?);
            return Ok(());
        }
        Command::Display { mode, basis } => {
            let (inventory, headline) = tokio::try_join!(client.inventory(), client.headline())?;

            println!("{headline}");
            for flavor in customer_view(&inventory, mode, basis) {
                println!("{flavor}");
            }
            return Ok(());
        }
        Command::Hold { flavor, millis } => {
            let held = Duration::from_millis(millis);
            let item = client
                .hold_sell(&flavor, held, HoldTiming::default(), args.bound)
                .await?;

            println!("{flavor}: {}", staff_view(&item, args.bound));
            return Ok(());
        }
        Command::Setup { flavor, amount } => (flavor, Operation::Setup(amount)),
        Command::Sell { flavor, count } => (flavor, Operation::Sell(count)),
        Command::Correct { flavor, count } => (flavor, Operation::Correct(count)),
        Command::Restock { flavor, delta } => (flavor, Operation::Restock(delta)),
        Command::Target { flavor, target } => (flavor, Operation::Target(target)),
        Command::Sold { flavor, sold } => (flavor, Operation::Sold(sold)),
    };

    let item = client.run(&flavor, operation, args.bound).await?;
    println!("{flavor}: {}", staff_view(&item, args.bound));

    Ok(())
}
