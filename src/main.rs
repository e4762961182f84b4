use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use kana_srs::app::{App, AppState};
use kana_srs::clock::SystemClock;
use kana_srs::config::Config;
use kana_srs::scheduler::Pick;
use log::info;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let mut app = App::new(&config, Arc::new(SystemClock)).await?;

    info!("reviewing deck {:?} ({} items)", app.deck_key, app.deck.len());
    println!("欢迎回来！今天有 {} 个假名需要复习。", app.due_count);
    println!("输入罗马字回答，:stats 查看统计，:q 退出");

    run_app(&mut app).await?;

    let stats = app.stats();
    println!(
        "本次复习 {} 张。 总计: {} 正确 / {} 错误",
        app.session.reviews_done(),
        stats.success_total,
        stats.failure_total
    );
    Ok(())
}

async fn run_app(app: &mut App) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    app.start_quiz();

    while app.state == AppState::Quiz {
        let Some(kana) = app.current.clone() else {
            break;
        };
        let tag = match app.current_pick {
            Some(Pick::New) => " (新)",
            _ => "",
        };
        stdout.write_all(format!("\n  {}{}\n> ", kana, tag).as_bytes()).await?;
        stdout.flush().await?;

        let asked_at = Instant::now();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let response_time_ms = asked_at.elapsed().as_millis() as u64;

        match line.trim() {
            ":q" => break,
            ":stats" => {
                println!("{}", serde_json::to_string_pretty(&app.stats())?);
                continue;
            }
            answer => {
                app.user_input = answer.to_string();
            }
        }

        app.submit_answer(response_time_ms).await?;
        println!("{}", app.feedback_detail);
        app.next_card();
    }

    if app.state == AppState::Finished {
        println!("\n今天的复习完成了！");
    }
    Ok(())
}
