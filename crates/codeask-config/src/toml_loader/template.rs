//! Commented default config written on first run.

pub(super) fn default_config_toml() -> &'static str {
    r#"# codeask configuration
# Only override what you want to change -- missing fields use defaults.
# Credentials come from the environment: OPENAI_API_KEY, ANTHROPIC_API_KEY
# or CLAUDE_CODE_OAUTH_TOKEN.

[ai]
provider = "openai"        # openai | claude
# model = "gpt-3.5-turbo-16k"
# max_tokens = 4096        # 1-200000
# temperature = 0.7        # 0.0-2.0
# base_url = "https://api.openai.com"
# request_timeout_secs = 120

[tracking]
policy = "manual"          # manual | workspace
# workspace_root = "."
# max_file_bytes = 1048576
# include_hidden = false

[logging]
# level = "info"           # debug | info | warn | error
"#
}
