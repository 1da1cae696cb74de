//! Argument parsing, context construction and command dispatch.

use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use nursery_api_models::{BreedMode, PageRequest, TransactionType};
use nursery_client::{ApiClient, CancellationToken, FileSessionStore};
use nursery_config::ClientConfig;
use nursery_signals::Signals;
use nursery_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, app_span, init_logging};
use tracing::{Instrument, info};
use url::Url;

use crate::client::{AppContext, CliError, CliResult, ask_stdin};
use crate::commands::{auth, breeds, dashboard, inventory, payments, saplings, theme, transactions};
use crate::output::flush_toasts;

const DEBUG_LOG_FILTER: &str = "info,nursery_client=debug,nursery_requests=debug,nursery_cli=debug";

/// Parses CLI arguments, executes the requested command and prints queued
/// toasts. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);

    let config = match load_config(cli.api_url.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };
    init_tracing(&config);

    let ctx = match build_context(&cli, config.clone()) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    let span = app_span(&config.app_name, config.profile.as_str(), command_name);
    let result = dispatch(cli.command, &ctx).instrument(span).await;

    let exit_code = match result {
        Ok(()) => 0,
        Err(err) => {
            ctx.signals().toasts.error(err.display_message());
            err.exit_code()
        }
    };
    flush_toasts(&ctx.signals().toasts);
    info!(command = command_name, exit_code, "command finished");
    exit_code
}

fn load_config(api_url: Option<Url>) -> CliResult<ClientConfig> {
    let config =
        ClientConfig::from_env().map_err(|err| CliError::validation(err.to_string()))?;
    Ok(match api_url {
        Some(url) => config.with_base_url(url),
        None => config,
    })
}

fn init_tracing(config: &ClientConfig) {
    let format = std::env::var("LOG_FORMAT").ok();
    let logging = LoggingConfig {
        enabled: config.enable_logging,
        level: if config.enable_debug {
            DEBUG_LOG_FILTER
        } else {
            DEFAULT_LOG_LEVEL
        },
        format: LogFormat::from_setting(format.as_deref()),
        build_sha: option_env!("NURSERY_BUILD_SHA").unwrap_or("dev"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn build_context(cli: &Cli, config: ClientConfig) -> CliResult<AppContext> {
    let store = Arc::new(FileSessionStore::new(config.session_path.clone()));
    let client = ApiClient::new(config, Signals::new(), store).map_err(CliError::from)?;

    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            watcher.cancel();
        }
    });

    Ok(AppContext {
        client: client.with_cancellation(cancel),
        output: cli.output,
        assume_yes: cli.yes,
        nursery_id: cli.nursery.clone(),
        ask: ask_stdin,
    })
}

async fn dispatch(command: Command, ctx: &AppContext) -> CliResult<()> {
    match command {
        Command::Login(args) => auth::handle_login(ctx, args).await,
        Command::Logout => auth::handle_logout(ctx),
        Command::Whoami => auth::handle_whoami(ctx).await,
        Command::Dashboard => dashboard::handle_dashboard(ctx).await,
        Command::Saplings(command) => match command {
            SaplingCommand::Ls(args) => saplings::handle_list(ctx, args).await,
            SaplingCommand::Show(args) => saplings::handle_show(ctx, args).await,
            SaplingCommand::Add(args) => saplings::handle_add(ctx, args).await,
            SaplingCommand::Rm(args) => saplings::handle_remove(ctx, args).await,
        },
        Command::Breeds(command) => match command {
            BreedCommand::Ls(args) => breeds::handle_list(ctx, args).await,
            BreedCommand::Show(args) => breeds::handle_show(ctx, args).await,
            BreedCommand::Add(args) => breeds::handle_add(ctx, args).await,
            BreedCommand::Rm(args) => breeds::handle_remove(ctx, args).await,
        },
        Command::Inventory(command) => match command {
            InventoryCommand::Ls(args) => inventory::handle_list(ctx, args).await,
            InventoryCommand::Adjust(args) => inventory::handle_adjust(ctx, args).await,
        },
        Command::Transactions(command) => match command {
            TransactionCommand::Ls(args) => transactions::handle_list(ctx, args).await,
            TransactionCommand::Show(args) => transactions::handle_show(ctx, args).await,
            TransactionCommand::Undo(args) => transactions::handle_undo(ctx, args).await,
            TransactionCommand::Rm(args) => transactions::handle_remove(ctx, args).await,
        },
        Command::Payments(command) => match command {
            PaymentCommand::Ls(args) => payments::handle_list(ctx, args).await,
            PaymentCommand::Add(args) => payments::handle_add(ctx, args).await,
            PaymentCommand::Rm(args) => payments::handle_remove(ctx, args).await,
        },
        Command::Theme(command) => match command {
            ThemeCommand::Show => theme::handle_show(ctx).await,
            ThemeCommand::Default => theme::handle_default(ctx).await,
            ThemeCommand::Set(args) => theme::handle_set(ctx, args).await,
        },
    }
}

#[derive(Parser)]
#[command(name = "nursery", about = "Command-line client for the nursery management backend")]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "NURSERY_API_URL",
        value_parser = parse_url,
        help = "Override the configured API base URL"
    )]
    api_url: Option<Url>,
    #[arg(
        long,
        global = true,
        env = "NURSERY_ID",
        help = "Nursery to act on (defaults to the signed-in operator's nursery)"
    )]
    nursery: Option<String>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(short, long, global = true, help = "Skip confirmation prompts")]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

/// Output format for commands that render structured data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session.
    Login(LoginArgs),
    /// Forget the stored session.
    Logout,
    /// Show the signed-in operator.
    Whoami,
    /// Stock and sales overview.
    Dashboard,
    #[command(subcommand)]
    Saplings(SaplingCommand),
    #[command(subcommand)]
    Breeds(BreedCommand),
    #[command(subcommand)]
    Inventory(InventoryCommand),
    #[command(subcommand)]
    Transactions(TransactionCommand),
    #[command(subcommand)]
    Payments(PaymentCommand),
    #[command(subcommand)]
    Theme(ThemeCommand),
}

#[derive(Subcommand)]
pub(crate) enum SaplingCommand {
    Ls(SaplingListArgs),
    Show(IdArgs),
    Add(SaplingAddArgs),
    Rm(IdArgs),
}

#[derive(Subcommand)]
pub(crate) enum BreedCommand {
    Ls(BreedListArgs),
    Show(IdArgs),
    Add(BreedAddArgs),
    Rm(IdArgs),
}

#[derive(Subcommand)]
pub(crate) enum InventoryCommand {
    Ls(InventoryListArgs),
    Adjust(InventoryAdjustArgs),
}

#[derive(Subcommand)]
pub(crate) enum TransactionCommand {
    Ls(TransactionListArgs),
    Show(IdArgs),
    Undo(IdArgs),
    Rm(IdArgs),
}

#[derive(Subcommand)]
pub(crate) enum PaymentCommand {
    Ls(PaymentListArgs),
    Add(PaymentAddArgs),
    Rm(IdArgs),
}

#[derive(Subcommand)]
pub(crate) enum ThemeCommand {
    Show,
    Default,
    Set(ThemeSetArgs),
}

#[derive(Args, Debug, Clone)]
pub(crate) struct LoginArgs {
    #[arg(long, env = "NURSERY_PHONE")]
    pub(crate) phone: String,
    #[arg(long, env = "NURSERY_PASSWORD", help = "Prompted for when omitted")]
    pub(crate) password: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct IdArgs {
    #[arg(help = "Record identifier")]
    pub(crate) id: String,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub(crate) struct PageArgs {
    #[arg(long, help = "Zero-based page to fetch")]
    pub(crate) page: Option<u32>,
    #[arg(long, help = "Items per page")]
    pub(crate) size: Option<u32>,
}

impl PageArgs {
    /// Paging is requested when either flag is present.
    pub(crate) fn request(self) -> Option<PageRequest> {
        (self.page.is_some() || self.size.is_some())
            .then(|| PageRequest::new(self.page, self.size))
    }
}

#[derive(Args, Debug, Clone)]
pub(crate) struct SaplingListArgs {
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[command(flatten)]
    pub(crate) paging: PageArgs,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct SaplingAddArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) description: Option<String>,
    #[arg(long)]
    pub(crate) image_url: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct BreedListArgs {
    #[arg(long, help = "Only breeds of this sapling")]
    pub(crate) sapling: Option<String>,
    #[command(flatten)]
    pub(crate) paging: PageArgs,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct BreedAddArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long, help = "Parent sapling identifier")]
    pub(crate) sapling: String,
    #[arg(long, value_parser = parse_breed_mode, default_value = "individual")]
    pub(crate) mode: BreedMode,
    #[arg(long, help = "Plants per slot; required for slot mode")]
    pub(crate) items_per_slot: Option<u32>,
    #[arg(long)]
    pub(crate) description: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct InventoryListArgs {
    #[arg(long, help = "Only breeds of this sapling")]
    pub(crate) sapling: Option<String>,
    #[command(flatten)]
    pub(crate) paging: PageArgs,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct InventoryAdjustArgs {
    #[arg(help = "Breed identifier")]
    pub(crate) breed_id: String,
    #[arg(long = "type", value_parser = parse_transaction_type)]
    pub(crate) kind: TransactionType,
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) quantity: i64,
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct TransactionListArgs {
    #[arg(long, help = "Only movements of this breed")]
    pub(crate) breed: Option<String>,
    #[command(flatten)]
    pub(crate) paging: PageArgs,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct PaymentListArgs {
    #[arg(help = "Transaction identifier")]
    pub(crate) transaction_id: String,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct PaymentAddArgs {
    #[arg(help = "Transaction identifier")]
    pub(crate) transaction_id: String,
    #[arg(long = "type", help = "Payment method, e.g. cash or upi")]
    pub(crate) kind: String,
    #[arg(long)]
    pub(crate) amount: f64,
    #[arg(long)]
    pub(crate) description: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ThemeSetArgs {
    #[arg(long)]
    pub(crate) primary_color: Option<String>,
    #[arg(long)]
    pub(crate) secondary_color: Option<String>,
    #[arg(long)]
    pub(crate) accent_color: Option<String>,
    #[arg(long)]
    pub(crate) font_family: Option<String>,
    #[arg(long)]
    pub(crate) font_size_base: Option<String>,
    #[arg(long)]
    pub(crate) logo_url: Option<String>,
    #[arg(long)]
    pub(crate) border_radius: Option<String>,
    #[arg(long, value_parser = ["light", "dark"])]
    pub(crate) mode: Option<String>,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::Dashboard => "dashboard",
        Command::Saplings(SaplingCommand::Ls(_)) => "saplings_ls",
        Command::Saplings(SaplingCommand::Show(_)) => "saplings_show",
        Command::Saplings(SaplingCommand::Add(_)) => "saplings_add",
        Command::Saplings(SaplingCommand::Rm(_)) => "saplings_rm",
        Command::Breeds(BreedCommand::Ls(_)) => "breeds_ls",
        Command::Breeds(BreedCommand::Show(_)) => "breeds_show",
        Command::Breeds(BreedCommand::Add(_)) => "breeds_add",
        Command::Breeds(BreedCommand::Rm(_)) => "breeds_rm",
        Command::Inventory(InventoryCommand::Ls(_)) => "inventory_ls",
        Command::Inventory(InventoryCommand::Adjust(_)) => "inventory_adjust",
        Command::Transactions(TransactionCommand::Ls(_)) => "transactions_ls",
        Command::Transactions(TransactionCommand::Show(_)) => "transactions_show",
        Command::Transactions(TransactionCommand::Undo(_)) => "transactions_undo",
        Command::Transactions(TransactionCommand::Rm(_)) => "transactions_rm",
        Command::Payments(PaymentCommand::Ls(_)) => "payments_ls",
        Command::Payments(PaymentCommand::Add(_)) => "payments_add",
        Command::Payments(PaymentCommand::Rm(_)) => "payments_rm",
        Command::Theme(ThemeCommand::Show) => "theme_show",
        Command::Theme(ThemeCommand::Default) => "theme_default",
        Command::Theme(ThemeCommand::Set(_)) => "theme_set",
    }
}

fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

fn parse_breed_mode(input: &str) -> Result<BreedMode, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "individual" => Ok(BreedMode::Individual),
        "slot" => Ok(BreedMode::Slot),
        other => Err(format!("unknown breed mode '{other}' (expected individual or slot)")),
    }
}

fn parse_transaction_type(input: &str) -> Result<TransactionType, String> {
    match input.parse::<TransactionType>()? {
        TransactionType::Unknown => Err(format!("unknown transaction type '{input}'")),
        kind => Ok(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_commands_and_global_flags() {
        let cli = Cli::try_parse_from([
            "nursery",
            "inventory",
            "adjust",
            "b1",
            "--type",
            "adjust",
            "--quantity",
            "-3",
            "--output",
            "json",
            "--yes",
        ])
        .expect("arguments parse");
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.yes);
        assert_eq!(command_label(&cli.command), "inventory_adjust");
        let Command::Inventory(InventoryCommand::Adjust(args)) = cli.command else {
            panic!("expected inventory adjust");
        };
        assert_eq!(args.kind, TransactionType::Adjust);
        assert_eq!(args.quantity, -3);
    }

    #[test]
    fn rejects_unknown_modes_and_types() {
        assert!(parse_breed_mode("tray").is_err());
        assert_eq!(parse_breed_mode(" Slot "), Ok(BreedMode::Slot));
        assert!(parse_transaction_type("transfer").is_err());
        assert_eq!(parse_transaction_type("sell"), Ok(TransactionType::Sell));
        assert!(parse_url("not a url").is_err());
    }

    #[test]
    fn paging_is_only_requested_when_a_flag_is_set() {
        assert_eq!(PageArgs::default().request(), None);
        let args = PageArgs {
            page: None,
            size: Some(50),
        };
        assert_eq!(args.request(), Some(PageRequest { page: 0, size: 50 }));
    }

    #[test]
    fn command_labels_are_stable() {
        let cli = Cli::try_parse_from(["nursery", "breeds", "rm", "b1"]).expect("parse");
        assert_eq!(command_label(&cli.command), "breeds_rm");
        let cli = Cli::try_parse_from(["nursery", "theme", "default"]).expect("parse");
        assert_eq!(command_label(&cli.command), "theme_default");
    }
}
