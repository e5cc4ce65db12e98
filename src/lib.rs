pub mod analysis;
pub mod database;
pub mod draft;
pub mod dto;
pub mod engine;
pub mod knowledge;
pub mod reranker;
pub mod scorers;
pub mod server;
pub mod session;

/// dimensional analysis types
pub type Score = f64;
pub type Probability = f64;

/// role probabilities below this threshold are discarded as noise.
/// 0.051 rather than 0.050 so that an exact 5% sits below the line.
pub const MIN_ROLE_PROBABILITY: Probability = 0.051;

// pick engine parameters
pub const PICK_WEIGHT_META: Score = 0.25;
pub const PICK_WEIGHT_PROFICIENCY: Score = 0.35;
pub const PICK_WEIGHT_MATCHUP: Score = 0.25;
pub const PICK_WEIGHT_COUNTER: Score = 0.15;
pub const SYNERGY_MULTIPLIER_RANGE: Score = 0.3;
pub const POOL_CANDIDATES_PER_PLAYER: usize = 15;
pub const META_CANDIDATES_PER_ROLE: usize = 10;

// ban service parameters
pub const BAN_P1_WEIGHT_TOURNAMENT: Score = 0.60;
pub const BAN_P1_WEIGHT_FLEX: Score = 0.25;
pub const BAN_P1_WEIGHT_PROFICIENCY: Score = 0.15;
pub const BAN_P2_WEIGHT_TOURNAMENT: Score = 0.50;
pub const BAN_P2_WEIGHT_PROFICIENCY: Score = 0.25;
pub const BAN_P2_WEIGHT_COMFORT: Score = 0.15;
pub const BAN_P2_WEIGHT_CONFIDENCE: Score = 0.10;

// proficiency parameters
pub const TRANSFER_MAX_WEIGHT: Score = 0.5;

// session parameters
pub const SESSION_TTL_SECONDS: u64 = 3600;
pub const SESSION_CLEANUP_INTERVAL_SECONDS: u64 = 60;
pub const DEFAULT_PATCH_VERSION: &str = "15.18";

// reranker parameters
pub const LLM_TEMPERATURE: f64 = 0.3;
pub const LLM_MAX_TOKENS: u32 = 2500;
pub const LLM_DEFAULT_TIMEOUT_SECONDS: f64 = 15.0;
pub const LLM_MAX_TIMEOUT_SECONDS: f64 = 30.0;

/// knowledge files keep three decimal places; scores match on the way out
pub(crate) fn round3(x: Score) -> Score {
    (x * 1000.0).round() / 1000.0
}

/// diagnostic capture toggle. replays default on, simulators default off.
pub fn diagnostics_enabled(replay: bool) -> bool {
    match std::env::var("DRAFTGAP_DIAGNOSTICS") {
        Ok(value) => value.trim().eq_ignore_ascii_case("true"),
        Err(_) => replay,
    }
}

/// initialize logging and exit on ctrl-c
pub fn init() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("forcing exit");
        std::process::exit(0);
    });
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// get a database connection and return the client
pub async fn db() -> std::sync::Arc<tokio_postgres::Client> {
    log::info!("connecting to match database");
    let tls = tokio_postgres::tls::NoTls;
    let ref url = std::env::var("DB_URL").expect("DB_URL must be set");
    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    std::sync::Arc::new(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_weights_sum_to_one() {
        let sum = PICK_WEIGHT_META + PICK_WEIGHT_PROFICIENCY + PICK_WEIGHT_MATCHUP + PICK_WEIGHT_COUNTER;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ban_weights_sum_to_one() {
        let p1 = BAN_P1_WEIGHT_TOURNAMENT + BAN_P1_WEIGHT_FLEX + BAN_P1_WEIGHT_PROFICIENCY;
        let p2 = BAN_P2_WEIGHT_TOURNAMENT
            + BAN_P2_WEIGHT_PROFICIENCY
            + BAN_P2_WEIGHT_COMFORT
            + BAN_P2_WEIGHT_CONFIDENCE;
        assert!((p1 - 1.0).abs() < 1e-9);
        assert!((p2 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rounding_keeps_three_decimals() {
        assert!(round3(0.123456) == 0.123);
        assert!(round3(0.9995) == 1.0);
    }
}
