use colored::Colorize;
use studioflow_config::Settings;

pub fn handle(settings: &Settings) -> anyhow::Result<()> {
    match studioflow_config::find_settings_file()? {
        Some(path) => println!("{} {}", "# 設定ファイル:".dimmed(), path.display()),
        None => println!("{}", "# 設定ファイルなし (デフォルト設定)".dimmed()),
    }
    print!("{}", serde_yaml::to_string(settings)?);
    Ok(())
}
