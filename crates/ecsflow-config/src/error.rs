use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件 {} 不存在", .0.display())]
    NotFound(PathBuf),

    #[error(
        "未找到配置文件。已检查以下位置:\n\
        - --config 参数或 ECSFLOW_CONFIG 环境变量\n\
        - 当前目录: config.yml, config.yaml\n\
        - ~/.config/ecsflow/config.yml"
    )]
    NoSettingsFile,

    #[error("解析配置文件失败: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("配置文件为空")]
    Empty,

    #[error(
        "配置文件中缺少阿里云AccessKey配置\n\
        请确保配置文件中包含以下结构:\n\
        aliyun:\n  access_key_id: 您的AccessKeyID\n  access_key_secret: 您的AccessKeySecret"
    )]
    MissingCredentials,

    #[error("加载配置文件失败: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
