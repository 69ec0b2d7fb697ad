use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use edusoho_api::{collect_pages, Params, TaskEvent};
use serde_json::Value;

use super::utils::{list_params, params_from, parse_param, CommandContext, PagingArgs};

#[derive(Args, Debug, Clone)]
pub struct CourseSetArgs {
    #[command(subcommand)]
    command: CourseSetCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum CourseSetCommands {
    /// Search course sets.
    List {
        /// Title keyword
        #[arg(long)]
        title: Option<String>,
        /// Category id
        #[arg(long)]
        category_id: Option<u64>,
        /// Sort order, e.g. -studentNum
        #[arg(long)]
        sort: Option<String>,
        /// Extra filter as KEY=VALUE or KEY:=JSON
        #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_param)]
        filters: Vec<(String, Value)>,
        #[command(flatten)]
        paging: PagingArgs,
        /// Walk every page instead of returning one window
        #[arg(long)]
        all: bool,
        /// Stop after this many items when using --all
        #[arg(long, requires = "all")]
        max: Option<usize>,
    },
    /// Show one course set.
    Get { id: u64 },
    /// List the courses of a course set.
    Courses { id: u64 },
    /// List the latest members of a course set.
    Members {
        id: u64,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// List reviews of a course set.
    Reviews {
        id: u64,
        #[command(flatten)]
        paging: PagingArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CourseArgs {
    #[command(subcommand)]
    command: CourseCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum CourseCommands {
    /// Search courses.
    List {
        /// Filter as KEY=VALUE or KEY:=JSON
        #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_param)]
        filters: Vec<(String, Value)>,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Show one course.
    Get { id: u64 },
    /// Join a course as the current user.
    Join { id: u64 },
    /// Leave a course.
    Exit {
        id: u64,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// List the chapters, units and tasks of a course.
    Items {
        id: u64,
        /// Include unpublished items
        #[arg(long)]
        include_unpublished: bool,
    },
    /// Report learning progress on a task.
    TaskEvent {
        course_id: u64,
        task_id: u64,
        /// doing or finish
        event: TaskEvent,
        /// Unix timestamp of the previous report (defaults to now)
        #[arg(long)]
        last_time: Option<i64>,
    },
}

pub async fn execute_course_set(args: CourseSetArgs, ctx: &CommandContext) -> Result<()> {
    match args.command {
        CourseSetCommands::List {
            title,
            category_id,
            sort,
            filters,
            paging,
            all,
            max,
        } => {
            let filter = Params::new()
                .set_opt("title", title)
                .set_opt("categoryId", category_id)
                .set_opt("sort", sort)
                .merge(params_from(filters));

            if all {
                list_all_course_sets(ctx, filter, paging.limit, max).await
            } else {
                let filter = list_params(paging, filter);
                ctx.emit(ctx.client.course_sets(&filter).await)
            }
        }
        CourseSetCommands::Get { id } => ctx.emit(ctx.client.course_set(id).await),
        CourseSetCommands::Courses { id } => ctx.emit(ctx.client.course_set_courses(id).await),
        CourseSetCommands::Members { id, paging } => {
            ctx.emit(ctx.client.course_set_members(id, paging.into()).await)
        }
        CourseSetCommands::Reviews { id, paging } => {
            ctx.emit(ctx.client.course_set_reviews(id, paging.into()).await)
        }
    }
}

async fn list_all_course_sets(
    ctx: &CommandContext,
    filter: Params,
    page_size: u32,
    max: Option<usize>,
) -> Result<()> {
    let result = collect_pages::<Value, _, _>(page_size, max, |paging| {
        let client = ctx.client.clone();
        let filter = filter.clone().merge(paging.into());
        async move { client.course_sets(&filter).await }
    })
    .await;

    match result {
        Ok(items) => ctx.renderer.render(&items),
        Err(err) => ctx.emit(Err(err)),
    }
}

pub async fn execute_course(args: CourseArgs, ctx: &CommandContext) -> Result<()> {
    match args.command {
        CourseCommands::List { filters, paging } => {
            let filter = list_params(paging, params_from(filters));
            ctx.emit(ctx.client.courses(&filter).await)
        }
        CourseCommands::Get { id } => ctx.emit(ctx.client.course(id).await),
        CourseCommands::Join { id } => ctx.emit(ctx.client.join_course(id).await),
        CourseCommands::Exit { id, reason } => ctx.emit(ctx.client.exit_course(id, &reason).await),
        CourseCommands::Items {
            id,
            include_unpublished,
        } => ctx.emit(ctx.client.course_items(id, !include_unpublished).await),
        CourseCommands::TaskEvent {
            course_id,
            task_id,
            event,
            last_time,
        } => {
            let last_time = last_time.unwrap_or_else(|| Utc::now().timestamp());
            ctx.emit(
                ctx.client
                    .task_event(course_id, task_id, event, last_time)
                    .await,
            )
        }
    }
}
