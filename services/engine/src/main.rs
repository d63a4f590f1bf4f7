use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use engine::config::{Config, LogFormat};
use engine::history::{is_low_balance, SessionStats};
use engine::ledger::{InMemoryLedger, Ledger};
use engine::round::RoundError;
use engine::surfaces::{HighLowChoice, HighLowTable, SignalDesk, TableSettings, WinGoTable};
use engine::timing::SystemClock;
use engine::BernoulliDraw;
use shared::{
    BetDescriptor, Parity, SizeCategory, TradeDirection, WheelColor, WheelNumber, WheelRange,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "engine=info".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        service = "engine",
        version = env!("CARGO_PKG_VERSION"),
        min_wager = config.wagers.min,
        max_wager = config.wagers.max,
        starting_balance = config.session.starting_balance,
        signal_category = ?config.session.signal_category,
        "Starting play-money session"
    );

    let ledger = Arc::new(InMemoryLedger::with_grant(config.session.starting_balance).await?);
    let shutdown = CancellationToken::new();

    let mut high_low = HighLowTable::new(
        ledger.clone(),
        BernoulliDraw::new(),
        TableSettings::high_low(&config)?,
    );
    let mut win_go = WinGoTable::new(
        ledger.clone(),
        BernoulliDraw::new(),
        TableSettings::win_go(&config)?,
    );
    let mut signal = SignalDesk::new(
        ledger.clone(),
        BernoulliDraw::new(),
        config.session.signal_category,
        config.wagers.bounds()?,
        config.timing.signal_poll(),
        config.timing.presentation(),
        Arc::new(SystemClock),
    );

    // Ctrl-C closes every surface; a pending reveal wait returns Cancelled
    {
        let shutdown = shutdown.clone();
        let tokens = [
            high_low.controller().shutdown_token(),
            win_go.controller().shutdown_token(),
            signal.shutdown_token(),
        ];
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                shutdown.cancel();
                for token in tokens {
                    token.cancel();
                }
            }
        });
    }

    let mut rng = rand::thread_rng();
    let min_wager = config.wagers.min;

    for _ in 0..config.session.demo_rounds {
        if shutdown.is_cancelled() || low_balance(&*ledger, min_wager).await? {
            break;
        }
        high_low.deal()?;
        let choice = *[
            HighLowChoice::Higher,
            HighLowChoice::Lower,
            HighLowChoice::Red,
            HighLowChoice::Black,
        ]
        .choose(&mut rng)
        .unwrap_or(&HighLowChoice::Red);
        let stake = pick_stake(&mut rng, &*ledger, min_wager).await?;
        report(high_low.play(choice, stake).await)?;
    }

    for _ in 0..config.session.demo_rounds {
        if shutdown.is_cancelled() || low_balance(&*ledger, min_wager).await? {
            break;
        }
        let heads = rng.gen_bool(0.5);
        let bet = match rng.gen_range(0..4) {
            0 if heads => BetDescriptor::Color(WheelColor::Red),
            0 => BetDescriptor::Color(WheelColor::Green),
            1 if heads => BetDescriptor::Parity(Parity::Odd),
            1 => BetDescriptor::Parity(Parity::Even),
            2 if heads => BetDescriptor::Range(WheelRange::Small),
            2 => BetDescriptor::Range(WheelRange::Big),
            _ => BetDescriptor::ExactNumber(WheelNumber::new(rng.gen_range(1..=14))?),
        };
        let stake = pick_stake(&mut rng, &*ledger, min_wager).await?;
        report(win_go.play(bet, stake).await)?;
    }

    // Signal rounds wait for wall-clock slots; one round shows the gate
    if !shutdown.is_cancelled() && !low_balance(&*ledger, min_wager).await? {
        let bet = if rng.gen_bool(0.5) {
            BetDescriptor::TradeDirection(TradeDirection::Buy)
        } else {
            BetDescriptor::Size(SizeCategory::Large)
        };
        tracing::info!(category = ?signal.category(), "Waiting for the next signal slot");
        report(signal.play(bet, min_wager).await)?;
    }

    let stats = [
        high_low.controller().history().stats(),
        win_go.controller().history().stats(),
        signal.controller().history().stats(),
    ]
    .iter()
    .fold(SessionStats::default(), |acc, s| acc.combine(s));

    tracing::info!(
        rounds = stats.rounds,
        wins = stats.wins,
        losses = stats.losses,
        amount_won = stats.amount_won,
        amount_lost = stats.amount_lost,
        win_rate = stats.win_rate(),
        net = stats.net,
        balance = ledger.balance().await?,
        summary = %serde_json::to_string(&stats)?,
        "Session finished"
    );

    Ok(())
}

async fn low_balance(ledger: &InMemoryLedger, min_wager: u64) -> Result<bool> {
    let balance = ledger.balance().await?;
    if is_low_balance(balance) || balance < min_wager {
        tracing::warn!(balance, "Balance too low to continue");
        return Ok(true);
    }
    Ok(false)
}

async fn pick_stake<R: Rng>(rng: &mut R, ledger: &InMemoryLedger, min_wager: u64) -> Result<u64> {
    let balance = ledger.balance().await?;
    let steps = (balance / min_wager).clamp(1, 5);
    Ok(min_wager * rng.gen_range(1..=steps))
}

fn report(outcome: std::result::Result<shared::RoundResult, RoundError>) -> Result<()> {
    match outcome {
        Ok(_) => Ok(()),
        Err(RoundError::Cancelled { round_id }) => {
            tracing::warn!(round_id = %round_id, "Round cancelled");
            Ok(())
        }
        Err(RoundError::SurfaceClosed) => Ok(()),
        Err(e) => {
            let service_error: shared::errors::ServiceError = e.into();
            tracing::error!(code = %service_error.code, error = %service_error, "Round failed");
            Err(service_error.into())
        }
    }
}
