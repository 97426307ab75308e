//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> String {
    r##"# oaik configuration
# Only override what you want to change -- missing fields use defaults.
# Every [session] value can also be changed at runtime with `%set NAME VALUE`.

[session]
# system_prompt = "You are a helpful assistant."   # "" disables the system message
# model = "gpt-3.5-turbo"
# temperature = 1.0
# size = "512x512"       # 256x256, 512x512 or 1024x1024
# n = 1                  # images per request, 1-10
# mode = "chat"          # chat, image
# use_history = true     # send prior exchanges with each chat request

[session.chat_kwargs]
# frequency_penalty = 1

[api]
# api_key = "sk-..."
# api_key_path = "/home/me/.openai_api_key"
# organization = "org-..."
# api_base = "https://api.openai.com/v1"
"##
    .to_string()
}
