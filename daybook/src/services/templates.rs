//! Templates service
//!
//! Ships four built-in templates, seeded into an empty table on start-up.

use crate::database::{NewTemplate, Repository, Template, TemplateCategory};
use crate::error::Result;

struct BuiltinTemplate {
    name: &'static str,
    description: &'static str,
    content: &'static str,
    category: TemplateCategory,
}

const BUILTIN_TEMPLATES: [BuiltinTemplate; 4] = [
    BuiltinTemplate {
        name: "Daily Reflection",
        description: "Reflect on your day",
        content: "# Daily Reflection\n\
                  \n\
                  ## What went well today?\n\
                  - \n\
                  \n\
                  ## What could have been better?\n\
                  - \n\
                  \n\
                  ## What did I learn?\n\
                  - \n\
                  \n\
                  ## Tomorrow I will focus on:\n\
                  - ",
        category: TemplateCategory::Daily,
    },
    BuiltinTemplate {
        name: "Gratitude Journal",
        description: "Write about what you are grateful for",
        content: "# Gratitude Journal\n\
                  \n\
                  ## Today I am grateful for:\n\
                  \n\
                  1. \n\
                  2. \n\
                  3. \n\
                  \n\
                  ## Why am I grateful?\n\
                  - \n\
                  \n\
                  ## How can I show my gratitude?\n\
                  - ",
        category: TemplateCategory::Gratitude,
    },
    BuiltinTemplate {
        name: "Dream Journal",
        description: "Record your dreams",
        content: "# Dream Journal\n\
                  \n\
                  ## Dream Date\n\
                  Date: \n\
                  \n\
                  ## Dream Description\n\
                  - \n\
                  \n\
                  ## Emotions Felt\n\
                  - \n\
                  \n\
                  ## Symbols & Meanings\n\
                  - \n\
                  \n\
                  ## Interpretation\n\
                  - ",
        category: TemplateCategory::Dream,
    },
    BuiltinTemplate {
        name: "Bullet Journal",
        description: "Quick bullet-style entry",
        content: "# Bullet Journal\n\
                  \n\
                  ## Tasks\n\
                  - [ ] \n\
                  - [ ] \n\
                  - [ ] \n\
                  \n\
                  ## Notes\n\
                  - \n\
                  - \n\
                  \n\
                  ## Events\n\
                  - \n\
                  - ",
        category: TemplateCategory::Bullet,
    },
];

/// Service for managing entry templates
#[derive(Clone)]
pub struct TemplatesService {
    repo: Repository,
}

impl TemplatesService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Seed the built-in templates when the table is empty.
    ///
    /// Returns the number of templates inserted.
    pub async fn initialize_templates(&self) -> Result<usize> {
        if !self.repo.list_templates().await?.is_empty() {
            tracing::debug!("Templates already present, skipping seed");
            return Ok(0);
        }

        for builtin in &BUILTIN_TEMPLATES {
            self.repo
                .create_template(&NewTemplate {
                    name: builtin.name.to_string(),
                    description: Some(builtin.description.to_string()),
                    content: builtin.content.to_string(),
                    category: builtin.category,
                })
                .await?;
        }

        tracing::info!("Seeded {} built-in templates", BUILTIN_TEMPLATES.len());

        Ok(BUILTIN_TEMPLATES.len())
    }

    /// All templates ordered by name
    pub async fn list_templates(&self) -> Result<Vec<Template>> {
        self.repo.list_templates().await
    }

    pub async fn get_template(&self, id: &str) -> Result<Template> {
        self.repo.get_template(id).await
    }

    pub async fn create_template(&self, req: NewTemplate) -> Result<Template> {
        tracing::info!("Creating template: {}", req.name);

        let template = self.repo.create_template(&req).await?;

        tracing::info!("Template created successfully: {}", template.id);

        Ok(template)
    }
}
