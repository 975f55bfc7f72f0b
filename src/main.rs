use anyhow::Result;
use app::setting::Setting;

const SETTING_PATH: &str = "data/setting.toml";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let setting = Setting::load_or_default(SETTING_PATH);
    setting.save(SETTING_PATH);

    app::run(setting)
}
