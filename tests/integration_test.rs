use std::sync::Arc;
use std::time::Duration;

use contact_discovery::utils::logging;
use contact_discovery::{App, BrowserSessionPool, ChromiumEngine, Config, PageFetcher};

#[tokio::test]
#[ignore] // 默认忽略，需要本机安装 Chrome：cargo test -- --ignored
async fn test_discover_real_site() {
    // 初始化日志
    logging::init(true);

    let config = Config {
        browser_pool_size: 2,
        max_concurrent_sublinks: 2,
        save_results: false,
        ..Config::from_env().expect("读取配置失败")
    };

    let app = App::initialize(config).expect("初始化失败");
    let results = app
        .run(&["https://example.com"])
        .await
        .expect("处理失败");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].domain, "example.com");
    assert!(app.pool().is_closed());
}

#[tokio::test]
#[ignore]
async fn test_chromium_session_fetches_html() {
    logging::init(true);

    let config = Config::from_env().expect("读取配置失败");
    let pool = BrowserSessionPool::new(
        Arc::new(ChromiumEngine::new(&config)),
        1,
        Duration::from_secs(30),
    );
    let fetcher = PageFetcher::from_config(&config);

    let lease = pool.acquire().await.expect("应该能够启动浏览器");
    let html = fetcher.fetch(lease.session(), "https://example.com/").await;
    pool.release(lease).await;
    pool.shutdown().await;

    let html = html.expect("应该能够读取页面");
    assert!(html.contains("<body"));
}
