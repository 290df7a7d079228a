#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .split_whitespace()
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        if args.is_empty() {
            return None;
        }
        let prefix = args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_help()
            || cmd.is_clear()
            || cmd.is_prompts()
            || cmd.is_ask_prompt()
            || cmd.is_retry()
            || cmd.is_copy_code_block()
            || cmd.is_model_list()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    pub fn is_clear(&self) -> bool {
        return ["/clear"].contains(&self.command.as_str());
    }

    pub fn is_prompts(&self) -> bool {
        return ["/p", "/prompts"].contains(&self.command.as_str());
    }

    pub fn is_ask_prompt(&self) -> bool {
        return ["/a", "/ask"].contains(&self.command.as_str());
    }

    pub fn is_retry(&self) -> bool {
        return ["/r", "/retry"].contains(&self.command.as_str());
    }

    pub fn is_copy_code_block(&self) -> bool {
        return ["/c", "/copy"].contains(&self.command.as_str());
    }

    pub fn is_model_list(&self) -> bool {
        return ["/ml", "/models", "/modellist"].contains(&self.command.as_str());
    }

    /// First argument parsed as a 1-based index, if present.
    pub fn index_arg(&self) -> Option<Result<usize, String>> {
        let arg = self.args.first()?;
        match arg.parse::<usize>() {
            Ok(idx) if idx > 0 => return Some(Ok(idx)),
            _ => return Some(Err(format!("'{arg}' is not a valid number."))),
        }
    }
}
