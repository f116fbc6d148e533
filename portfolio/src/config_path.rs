use std::fs;

pub fn get() -> String {
    let config_path = match std::env::var("PF_CONFIG_PATH") {
        Ok(path) => path,
        Err(_) => "config.yml".to_owned(),
    };

    if fs::metadata(&config_path).is_err() {
        pf_log::panic(
            None,
            format!("[Portfolio] Config file {config_path} does not exist, set PF_CONFIG_PATH or add config.yml to the current directory"),
        );
    }

    config_path
}
