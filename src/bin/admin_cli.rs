use std::env;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tbf_poll::{
    api::{
        admin::{CreatePollOption, CreatePollQuestionRequest, CreatePollRequest, ListQuery},
        ApiClient,
    },
    config::Config,
    model::admin::Pagination,
    session::SessionStore,
};

const USAGE: &str = "\
usage: admin-cli <command>

  login <email> <password>            authenticate and persist the session
  logout                              drop the persisted session
  me                                  show the logged-in admin
  stats                               dashboard counters
  users [page]                        list users
  user-status <id> <on|off>           activate / deactivate a user
  delete-user <id>
  polls [page]                        list polls
  poll <id>                           poll detail with per-option tallies
  create-poll <name> <ends-rfc3339> <option>...
  delete-poll <id>
  questions [page]                    list poll questions
  ask <question> <ends-rfc3339>       create a poll question
  delete-question <id>
  notifications [page]                recent vote notifications
";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::from_env();
    let store = SessionStore::new(config.data_dir.clone());

    let command = args.first().map(String::as_str).unwrap_or("help");
    match command {
        "login" => {
            let (email, password) = match (args.get(1), args.get(2)) {
                (Some(e), Some(p)) => (e.as_str(), p.as_str()),
                _ => bail!("usage: admin-cli login <email> <password>"),
            };
            let api = ApiClient::new(&config.api_base_url, None)?;
            let (session, admin) = api.admin_login(email, password).await?;
            store.save(&session)?;
            println!("Logged in as {}", admin.admin_email);
        }
        "logout" => {
            store.clear()?;
            println!("Logged out");
        }
        "help" | "--help" | "-h" => print!("{USAGE}"),
        _ => {
            let session = store
                .load()
                .context("not logged in; run: admin-cli login <email> <password>")?;
            let api = ApiClient::new(&config.api_base_url, Some(session))?;
            run_authed(&api, command, &args[1..]).await?;
        }
    }
    Ok(())
}

async fn run_authed(api: &ApiClient, command: &str, args: &[String]) -> Result<()> {
    match command {
        "me" => {
            let admin = api.admin_me().await?;
            println!("{} <{}>", admin.name.as_deref().unwrap_or("-"), admin.admin_email);
        }
        "stats" => {
            let stats = api.dashboard_stats().await?;
            println!("users          {}", stats.total_users);
            println!("active polls   {}", stats.active_polls);
            println!("votes          {}", stats.total_votes);
            println!("notifications  {}", stats.total_notifications);
        }
        "users" => {
            let (users, pagination) = api.list_users(&ListQuery::page(page_arg(args))).await?;
            for user in &users {
                let state = if user.is_active { "active" } else { "inactive" };
                println!("{}  {:<24} {:<8} {}", user.id, user.name, state, user.signed_up);
            }
            print_pagination(&pagination);
        }
        "user-status" => {
            let (id, state) = match (args.first(), args.get(1)) {
                (Some(id), Some(s)) => (id.as_str(), s.as_str()),
                _ => bail!("usage: admin-cli user-status <id> <on|off>"),
            };
            let is_active = match state {
                "on" => true,
                "off" => false,
                other => bail!("expected on|off, got {other}"),
            };
            let now_active = api.set_user_status(id, is_active).await?;
            println!("user {id} active: {now_active}");
        }
        "delete-user" => {
            let id = args.first().context("usage: admin-cli delete-user <id>")?;
            println!("{}", api.delete_user(id).await?);
        }
        "polls" => {
            let (polls, pagination) = api.list_polls(&ListQuery::page(page_arg(args))).await?;
            for poll in &polls {
                println!(
                    "{}  {:<28} {:<8} {:>5} votes  ends {}",
                    poll.id,
                    poll.poll_name,
                    poll.status,
                    poll.total_votes,
                    local(poll.poll_duration)
                );
            }
            print_pagination(&pagination);
        }
        "poll" => {
            let id = args.first().context("usage: admin-cli poll <id>")?;
            let poll = api.admin_poll(id).await?;
            println!("{} by {}", poll.poll_name, poll.created_by_name);
            println!("ends {}", local(poll.poll_duration));
            for opt in &poll.options {
                println!("  {:<24} {:>5}", opt.option_text, opt.vote_count);
            }
        }
        "create-poll" => {
            if args.len() < 4 {
                bail!("usage: admin-cli create-poll <name> <ends-rfc3339> <option> <option>...");
            }
            let request = CreatePollRequest {
                poll_name: args[0].clone(),
                poll_duration: parse_when(&args[1])?,
                options: args[2..]
                    .iter()
                    .map(|text| CreatePollOption {
                        option_text: text.clone(),
                    })
                    .collect(),
            };
            let poll = api.create_poll(&request).await?;
            println!("created poll {}", poll.id);
            if let Some(link) = &poll.share_able {
                println!("share link: {link}");
            }
        }
        "delete-poll" => {
            let id = args.first().context("usage: admin-cli delete-poll <id>")?;
            println!("{}", api.delete_poll(id).await?);
        }
        "questions" => {
            let (questions, pagination) =
                api.list_poll_questions(&ListQuery::page(page_arg(args))).await?;
            for q in &questions {
                println!("{}  {:<40} ends {}", q.id, q.question, local(q.end_time));
            }
            if let Some(pagination) = pagination {
                print_pagination(&pagination);
            }
        }
        "ask" => {
            let (question, ends) = match (args.first(), args.get(1)) {
                (Some(q), Some(e)) => (q.clone(), e.as_str()),
                _ => bail!("usage: admin-cli ask <question> <ends-rfc3339>"),
            };
            let created = api
                .create_poll_question(&CreatePollQuestionRequest {
                    question,
                    end_time: parse_when(ends)?,
                })
                .await?;
            println!("created question {}", created.id);
        }
        "delete-question" => {
            let id = args
                .first()
                .context("usage: admin-cli delete-question <id>")?;
            println!("{}", api.delete_poll_question(id).await?);
        }
        "notifications" => {
            let (items, pagination) =
                api.list_notifications(&ListQuery::page(page_arg(args))).await?;
            for item in &items {
                println!("{}  {}", local(item.created_at), item.title);
                println!("    {}", item.message);
                if let Some(loc) = &item.location_message {
                    println!("    {loc}");
                }
            }
            print_pagination(&pagination);
        }
        other => {
            eprintln!("unknown command: {other}\n");
            print!("{USAGE}");
            std::process::exit(2);
        }
    }
    Ok(())
}

fn page_arg(args: &[String]) -> u32 {
    args.first().and_then(|a| a.parse().ok()).unwrap_or(1)
}

fn parse_when(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .with_context(|| format!("not an RFC 3339 timestamp: {raw}"))
}

fn local(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn print_pagination(p: &Pagination) {
    println!("page {}/{} ({} total)", p.page, p.total_pages, p.total);
}
