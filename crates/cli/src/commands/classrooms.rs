use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::Value;

use super::utils::{list_params, params_from, parse_param, CommandContext, PagingArgs};

#[derive(Args, Debug, Clone)]
pub struct ClassroomArgs {
    #[command(subcommand)]
    command: ClassroomCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum ClassroomCommands {
    /// Search classrooms.
    List {
        /// Filter as KEY=VALUE or KEY:=JSON
        #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_param)]
        filters: Vec<(String, Value)>,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Show one classroom.
    Get { id: u64 },
    /// List the courses bundled in a classroom.
    Courses { id: u64 },
    /// List classroom members.
    Members {
        id: u64,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Join a classroom as the current user.
    Join {
        id: u64,
        /// Join through the marketing platform
        #[arg(long)]
        marketing: bool,
    },
}

pub async fn execute(args: ClassroomArgs, ctx: &CommandContext) -> Result<()> {
    let client = &ctx.client;
    let result = match args.command {
        ClassroomCommands::List { filters, paging } => {
            let filter = list_params(paging, params_from(filters));
            client.classrooms(&filter).await
        }
        ClassroomCommands::Get { id } => client.classroom(id).await,
        ClassroomCommands::Courses { id } => client.classroom_courses(id).await,
        ClassroomCommands::Members { id, paging } => {
            client.classroom_members(id, paging.into()).await
        }
        ClassroomCommands::Join { id, marketing: true } => {
            client.join_classroom_via_marketing(id).await
        }
        ClassroomCommands::Join { id, .. } => client.join_classroom(id).await,
    };
    ctx.emit(result)
}
