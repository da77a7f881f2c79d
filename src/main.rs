use std::{
    env,
    io::{self, Write},
};

use anyhow::Result;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tbf_poll::{
    api::ApiClient,
    config::Config,
    device::DeviceStore,
    geo::{FixedPosition, GeoEnricher, LocationStatus},
    model::poll::Poll,
    results,
    vote_flow::{PollView, VotePage},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let arg = env::args().nth(1).unwrap_or_default();
    let Some(poll_id) = parse_poll_id(&arg) else {
        eprintln!("usage: tbf-vote <poll id or /poll/… share link>");
        std::process::exit(2);
    };

    let config = Config::from_env();
    let device_id = DeviceStore::new(config.data_dir.clone()).get_or_create();

    let api = ApiClient::new(&config.api_base_url, None)?;
    let mut page = VotePage::new(poll_id, device_id);
    let mut enricher = GeoEnricher::new(config.position.map(FixedPosition));

    // Poll data and location resolve independently; the ballot never
    // waits for the enricher.
    let (snapshot, ()) = tokio::join!(
        api.get_poll(page.poll_id(), page.device_id()),
        enricher.request_location()
    );
    let mut snapshot = match snapshot {
        Ok(snapshot) => snapshot,
        Err(err) => {
            // blocking: no ballot or results without poll data
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    page.apply_fetch(snapshot.my_vote.as_deref());

    render_header(&snapshot.poll);

    loop {
        match page.view(&snapshot.poll, Utc::now()) {
            PollView::Results => {
                render_results(&snapshot.poll);
                break;
            }
            PollView::Confirmation => {
                render_confirmation(&page);
                break;
            }
            PollView::Ballot => {
                render_ballot(&snapshot.poll, enricher.status());
                let Some(choice) = prompt_selection(&snapshot.poll)? else {
                    continue;
                };
                page.select(&choice);
                let Some(option_id) = page.begin_submit() else {
                    continue;
                };
                let request = page.vote_request(option_id, enricher.status(), &user_agent());

                println!("Submitting...");
                match api.vote(page.poll_id(), &request).await {
                    Ok(updated) => {
                        page.finish_submit_ok();
                        snapshot.poll = updated;
                        // one awaited refresh so the next view reflects
                        // the server's record of this device's vote
                        match api.get_poll(page.poll_id(), page.device_id()).await {
                            Ok(fresh) => {
                                page.apply_fetch(fresh.my_vote.as_deref());
                                snapshot = fresh;
                            }
                            Err(err) => tracing::warn!(%err, "post-vote refresh failed"),
                        }
                    }
                    Err(err) => page.finish_submit_err(Some(err.to_string())),
                }
                if let Some(msg) = page.message() {
                    println!("{msg}");
                }
            }
        }
    }

    Ok(())
}

/// Accepts a bare poll id or a share link like
/// `https://tbf.app/poll/665f1`, with or without query parameters.
fn parse_poll_id(arg: &str) -> Option<String> {
    let arg = arg.trim();
    if arg.is_empty() {
        return None;
    }
    let tail = match arg.rfind("/poll/") {
        Some(idx) => &arg[idx + "/poll/".len()..],
        None if arg.contains('/') => return None,
        None => arg,
    };
    let id = tail
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

fn user_agent() -> String {
    format!(
        "tbf-vote/{} (tbf; {} {})",
        env!("CARGO_PKG_VERSION"),
        env::consts::OS,
        env::consts::ARCH
    )
}

fn render_header(poll: &Poll) {
    println!();
    println!("  {}", poll.poll_name);
    println!("  {}'s Poll", poll.owner_name());
    println!("  {}", poll.ends_text(Utc::now()));
    println!();
}

fn render_ballot(poll: &Poll, location: &LocationStatus) {
    for (idx, opt) in poll.options.iter().enumerate() {
        println!("  [{}] {}", idx + 1, opt.option_text);
    }
    println!();
    println!("  Your vote is anonymous, no one will know what you voted 🫣");
    if let Some(err) = location.error_text() {
        println!("  {err} Your vote will still be recorded without location.");
    }
    println!("  Results for this poll will be shown once the poll ends 👀");
}

fn render_confirmation(page: &VotePage) {
    println!("  ✔ Your Vote has been submitted");
    println!("  Stay tuned for the results once the poll ends 👀");
    println!(
        "  🔥 {} people just tapped the button 🔥",
        page.social_proof()
    );
}

fn render_results(poll: &Poll) {
    let summary = results::compute(&poll.options);
    println!("  {} Votes", summary.total_votes);
    println!();
    for row in &summary.rows {
        let crown = if row.is_winner { "👑 " } else { "   " };
        let bar = "█".repeat((row.pct as usize) / 2);
        println!("  {}{:<24} {:>3}%  {}", crown, row.text, row.pct, bar);
    }
}

fn prompt_selection(poll: &Poll) -> Result<Option<String>> {
    print!("\nPick an option (1-{}), or q to quit: ", poll.options.len());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        std::process::exit(0);
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=poll.options.len()).contains(&n) => {
            Ok(Some(poll.options[n - 1].id.clone()))
        }
        _ => {
            println!("Not an option on this ballot.");
            Ok(None)
        }
    }
}
