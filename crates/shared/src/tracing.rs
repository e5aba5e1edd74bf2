use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// サーバー用のトレーシングサブスクライバーを初期化
/// RUST_LOG で出力レベルを制御する（未設定時は info）
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // 構造化ログ（JSON）で標準出力へ
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).json())
        .with(env_filter("info"))
        .try_init()?;

    Ok(())
}

/// CLI 用の初期化。描画結果と混ざらないよう標準エラーへ人間向け形式で出す
pub fn init_cli_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(env_filter("warn"))
        .try_init()?;

    Ok(())
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}
