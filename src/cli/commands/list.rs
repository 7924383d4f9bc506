use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::*;

use crate::api::{Credential, CredentialService, ViewOptions};

#[derive(Args)]
pub struct ListArgs {
    /// Page to show (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Field to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

impl ListArgs {
    pub fn apply(&self, mut options: ViewOptions) -> ViewOptions {
        if let Some(page) = self.page {
            options.current_page = page.max(1);
        }
        if let Some(sort) = &self.sort {
            options.sort_field = sort.clone();
        }
        if self.desc {
            options.sort_ascending = false;
        }
        options
    }
}

pub async fn list_command(
    args: ListArgs,
    service: Arc<dyn CredentialService>,
    options: ViewOptions,
) -> Result<()> {
    let options = args.apply(options);
    log::info!("Listing credentials page {}", options.current_page);

    let page = service.list_credentials(&options).await?;

    if page.results.is_empty() {
        println!("{}", "No credentials found".yellow());
        return Ok(());
    }

    println!(
        "{} (page {}, {} total)",
        "Credentials".bold(),
        options.current_page,
        page.count
    );
    for credential in &page.results {
        println!("  {}", describe(credential));
    }

    if page.next.is_some() {
        println!(
            "{}",
            format!("  more available: --page {}", options.current_page + 1).dimmed()
        );
    }
    Ok(())
}

fn describe(credential: &Credential) -> String {
    let auth = if credential.uses_ssh_key() { "ssh key" } else { "password" };
    format!(
        "{:>5}  {}  {}  {} ({})",
        credential.id.to_string().cyan(),
        credential.name.as_str().bold(),
        credential.kind.label().bright_blue(),
        credential.username,
        auth.dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args_override_view_options() {
        let args = ListArgs {
            page: Some(0),
            sort: Some("cred_type".to_string()),
            desc: true,
        };
        let options = args.apply(ViewOptions::default());
        assert_eq!(options.current_page, 1);
        assert_eq!(options.sort_field, "cred_type");
        assert!(!options.sort_ascending);
    }
}
