use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use contact_discovery::utils::{logging, url::with_default_scheme};
use contact_discovery::{App, Config};

/// 从网站中发现联系邮箱
#[derive(Debug, Parser)]
#[command(name = "contact-discovery", version, about)]
struct Cli {
    /// 种子域名或 URL，未写协议时默认 https://
    domains: Vec<String>,

    /// TOML 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 浏览器池容量
    #[arg(long)]
    pool_size: Option<usize>,

    /// 同时处理的域名数
    #[arg(long = "domains")]
    max_domains: Option<usize>,

    /// 每个域名同时处理的子链接数
    #[arg(long = "sublinks")]
    max_sublinks: Option<usize>,

    /// 结果输出目录
    #[arg(long)]
    output_dir: Option<String>,

    /// 不保存 JSON 结果文件
    #[arg(long)]
    no_save: bool,

    /// 显示浏览器窗口
    #[arg(long)]
    headed: bool,

    /// Chrome / Chromium 可执行文件路径
    #[arg(long)]
    chrome: Option<String>,

    /// 输出 debug 日志
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// 命令行参数覆盖配置文件和环境变量
    fn apply(&self, config: &mut Config) {
        if let Some(size) = self.pool_size {
            config.browser_pool_size = size;
        }
        if let Some(domains) = self.max_domains {
            config.max_concurrent_domains = domains;
        }
        if let Some(sublinks) = self.max_sublinks {
            config.max_concurrent_sublinks = sublinks;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.no_save {
            config.save_results = false;
        }
        if self.headed {
            config.headless = false;
        }
        if let Some(chrome) = &self.chrome {
            config.chrome_executable = Some(chrome.clone());
        }
        if self.verbose {
            config.verbose_logging = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    // 初始化日志
    logging::init(config.verbose_logging);

    let seeds: Vec<String> = cli
        .domains
        .iter()
        .map(|domain| with_default_scheme(domain.trim()))
        .collect();
    if seeds.is_empty() {
        bail!("no domains given");
    }

    // 初始化并运行应用
    App::initialize(config)?.run(&seeds).await?;

    Ok(())
}
