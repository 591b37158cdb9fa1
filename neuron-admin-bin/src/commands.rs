use clap::{Args, Subcommand};
use neuron_admin_client::HttpConfigClient;
use neuron_admin_common::TracingNotifier;
use neuron_admin_core::{
    node_config::find_node, write_tag_template, NodeConfigService, PluginManager,
    SouthDriverList, TagImporter,
};
use neuron_admin_error::{NAError, NAResult};
use neuron_admin_models::{
    domain::prelude::{DriverSortKey, NodeQuery, PageParams, SortOrder, SouthDriver},
    settings::Settings,
};
use serde_json::Value as Json;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Subcommand)]
pub enum Command {
    /// Tag sheet import and template export
    #[command(subcommand)]
    Tags(TagsCommand),
    /// South driver list and actions
    #[command(subcommand)]
    Drivers(DriversCommand),
    /// Node configuration
    #[command(subcommand)]
    NodeConfig(NodeConfigCommand),
    /// Plugin libraries
    #[command(subcommand)]
    Plugins(PluginsCommand),
}

#[derive(Subcommand)]
pub enum TagsCommand {
    /// Import a tag sheet into a node
    Import {
        #[arg(long)]
        node: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Write an empty tag sheet
    Template {
        #[arg(long)]
        file: PathBuf,
        /// Add one sample row
        #[arg(long)]
        sample: bool,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by node name
    #[arg(long)]
    node: Option<String>,
    /// Filter by plugin name
    #[arg(long)]
    plugin: Option<String>,
    /// name, plugin, status or connection
    #[arg(long)]
    sort: Option<DriverSortKey>,
    #[arg(long, default_value = "asc")]
    order: SortOrder,
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Defaults to `drivers.page_size`
    #[arg(long)]
    page_size: Option<u32>,
    /// Keep refreshing states until interrupted
    #[arg(long)]
    watch: bool,
}

#[derive(Subcommand)]
pub enum DriversCommand {
    List(ListArgs),
    Delete {
        #[arg(long)]
        node: String,
    },
    /// Switch a driver's log level to debug
    Debug {
        #[arg(long)]
        node: String,
    },
}

#[derive(Subcommand)]
pub enum NodeConfigCommand {
    Show {
        #[arg(long)]
        node: String,
    },
    Submit {
        #[arg(long)]
        node: String,
        /// Field override as `key=value`; the value is parsed as JSON when possible
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, Json)>,
    },
}

#[derive(Subcommand)]
pub enum PluginsCommand {
    List,
    Add {
        #[arg(long)]
        library: String,
    },
    Delete {
        #[arg(long)]
        name: String,
    },
}

fn parse_assignment(s: &str) -> Result<(String, Json), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{s}`"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Json::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub async fn run(command: Command, client: &HttpConfigClient, settings: &Settings) -> NAResult<()> {
    match command {
        Command::Tags(cmd) => run_tags(cmd, client).await,
        Command::Drivers(cmd) => run_drivers(cmd, client, settings).await,
        Command::NodeConfig(cmd) => run_node_config(cmd, client).await,
        Command::Plugins(cmd) => run_plugins(cmd, client).await,
    }
}

async fn run_tags(cmd: TagsCommand, client: &HttpConfigClient) -> NAResult<()> {
    match cmd {
        TagsCommand::Import { node, file } => {
            let info = find_node(client, &node).await?;
            let schema = PluginManager::new(client, TracingNotifier)
                .schema_for_plugin(&info.plugin)
                .await?;
            let report = TagImporter::new(client, TracingNotifier, schema)
                .upload_file(&file, &node)
                .await?;
            for group in &report.groups {
                println!("{}\t{} tag(s)", group.group, group.tags);
            }
            println!("{} tag(s) imported into `{}`", report.total_tags(), report.node);
            Ok(())
        }
        TagsCommand::Template { file, sample } => write_tag_template(&file, sample),
    }
}

fn print_drivers(list: &SouthDriverList<&HttpConfigClient, TracingNotifier>, params: PageParams) {
    let page = list.page(params);
    println!("{:<24} {:<24} {:<10} {:<12}", "NAME", "PLUGIN", "STATUS", "CONNECTION");
    for SouthDriver {
        name,
        plugin,
        running,
        link,
    } in &page.records
    {
        println!("{name:<24} {plugin:<24} {:<10} {:<12}", running.as_str(), link.as_str());
    }
    println!(
        "page {}/{} ({} driver(s))",
        page.page,
        page.pages.max(1),
        page.total
    );
}

async fn run_drivers(
    cmd: DriversCommand,
    client: &HttpConfigClient,
    settings: &Settings,
) -> NAResult<()> {
    let mut list = SouthDriverList::new(client, TracingNotifier);
    match cmd {
        DriversCommand::List(args) => {
            list.load(NodeQuery {
                node: args.node,
                plugin: args.plugin,
            })
            .await?;
            if let Some(key) = args.sort {
                list.sort_by(key, args.order);
            }
            let params = PageParams::new(
                args.page,
                args.page_size.unwrap_or(settings.drivers.page_size),
            );
            print_drivers(&list, params);

            if args.watch {
                let shutdown = CancellationToken::new();
                let token = shutdown.clone();
                tokio::spawn(async move {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        warn!("Failed to listen for ctrl-c: {e}");
                    }
                    token.cancel();
                });
                info!(
                    "Refreshing driver states every {}s, press ctrl-c to stop",
                    settings.drivers.refresh_interval().as_secs()
                );
                list.watch(settings.drivers.refresh_interval(), shutdown, |list| {
                    print_drivers(list, params)
                })
                .await;
            }
            Ok(())
        }
        DriversCommand::Delete { node } => {
            list.load(NodeQuery::default()).await?;
            list.delete_driver(&node).await
        }
        DriversCommand::Debug { node } => {
            list.load(NodeQuery::default()).await?;
            list.enable_debug_log(&node).await
        }
    }
}

async fn run_node_config(cmd: NodeConfigCommand, client: &HttpConfigClient) -> NAResult<()> {
    let service = NodeConfigService::new(client, TracingNotifier);
    match cmd {
        NodeConfigCommand::Show { node } => {
            let form = service.load(&node).await?;
            println!("node `{}` (plugin `{}`)", form.node.name, form.node.plugin);
            println!("{}", serde_json::to_string_pretty(&form.values)?);
            Ok(())
        }
        NodeConfigCommand::Submit { node, set } => {
            let mut form = service.load(&node).await?;
            for (key, value) in set {
                if form.schema().field(&key).is_none() {
                    return Err(NAError::InvalidArgument(format!(
                        "`{key}` is not a configuration field of plugin `{}`",
                        form.node.plugin
                    )));
                }
                form.set(key, value);
            }
            let sent = service.submit(&form).await?;
            println!("{}", serde_json::to_string_pretty(&sent)?);
            Ok(())
        }
    }
}

async fn run_plugins(cmd: PluginsCommand, client: &HttpConfigClient) -> NAResult<()> {
    let plugins = PluginManager::new(client, TracingNotifier);
    match cmd {
        PluginsCommand::List => {
            println!("{:<24} {:<36} {:<24}", "NAME", "LIBRARY", "SCHEMA");
            for plugin in plugins.list_plugins().await? {
                println!(
                    "{:<24} {:<36} {:<24}",
                    plugin.name,
                    plugin.library,
                    plugin.schema_name()
                );
            }
            Ok(())
        }
        PluginsCommand::Add { library } => plugins.add_plugin(&library).await,
        PluginsCommand::Delete { name } => plugins.delete_plugin(&name).await,
    }
}
