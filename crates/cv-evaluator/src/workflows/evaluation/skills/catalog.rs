use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::super::domain::SkillCategory;
use super::contains_term;

/// Category → skill tables used to recognize skills in résumé text.
///
/// The built-in tables are the default; tests and deployments can substitute their own,
/// either programmatically or from a `category,skill` CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCatalog {
    tables: BTreeMap<SkillCategory, Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read skill catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid skill catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown skill category '{category}' on row {row}")]
    UnknownCategory { row: usize, category: String },
    #[error("skill catalog contains no skills")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    category: String,
    skill: String,
}

impl SkillCatalog {
    /// Builds a catalog from explicit tables. Entries are lowercased, trimmed and
    /// de-duplicated; blank entries are dropped.
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = (SkillCategory, Vec<S>)>,
        S: AsRef<str>,
    {
        let mut catalog = Self {
            tables: BTreeMap::new(),
        };
        for (category, skills) in tables {
            for skill in skills {
                catalog.push(category, skill.as_ref());
            }
        }
        catalog
    }

    pub fn builtin() -> Self {
        Self::new(builtin_tables())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut catalog = Self {
            tables: BTreeMap::new(),
        };

        for (index, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            let row = row?;
            let category = SkillCategory::from_key(&row.category).ok_or_else(|| {
                CatalogError::UnknownCategory {
                    // header is row 1
                    row: index + 2,
                    category: row.category.clone(),
                }
            })?;
            catalog.push(category, &row.skill);
        }

        if catalog.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(catalog)
    }

    fn push(&mut self, category: SkillCategory, skill: &str) {
        let skill = skill.trim().to_lowercase();
        if skill.is_empty() {
            return;
        }
        let entries = self.tables.entry(category).or_default();
        if !entries.contains(&skill) {
            entries.push(skill);
        }
    }

    pub fn skills(&self, category: SkillCategory) -> &[String] {
        self.tables
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn tables(&self) -> impl Iterator<Item = (SkillCategory, &[String])> {
        self.tables
            .iter()
            .map(|(category, skills)| (*category, skills.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Classifies a free-form skill name: exact entry first, then the first entry that
    /// contains or is contained by the name as a whole token. Unknown names land in `Other`.
    pub fn category_of(&self, skill: &str) -> SkillCategory {
        let needle = skill.trim().to_lowercase();
        if needle.is_empty() {
            return SkillCategory::Other;
        }

        if let Some((category, _)) = self
            .tables
            .iter()
            .find(|(_, skills)| skills.iter().any(|entry| *entry == needle))
        {
            return *category;
        }

        self.tables
            .iter()
            .find(|(_, skills)| {
                skills
                    .iter()
                    .any(|entry| contains_term(entry, &needle) || contains_term(&needle, entry))
            })
            .map(|(category, _)| *category)
            .unwrap_or(SkillCategory::Other)
    }
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_tables() -> Vec<(SkillCategory, Vec<&'static str>)> {
    vec![
        (
            SkillCategory::Languages,
            vec![
                "python",
                "javascript",
                "typescript",
                "java",
                "c#",
                "c++",
                "go",
                "rust",
                "ruby",
                "php",
                "swift",
                "kotlin",
                "scala",
                "r",
                "matlab",
            ],
        ),
        (
            SkillCategory::FrontendFrameworks,
            vec![
                "react",
                "vue",
                "angular",
                "svelte",
                "next.js",
                "nuxt",
                "gatsby",
                "bootstrap",
                "tailwind",
                "material-ui",
                "redux",
                "zustand",
            ],
        ),
        (
            SkillCategory::BackendFrameworks,
            vec![
                "django", "flask", "fastapi", "express", "spring", "laravel", "rails", ".net",
                "nestjs", "hapi", "fastify",
            ],
        ),
        (
            SkillCategory::MlAi,
            vec![
                "tensorflow",
                "pytorch",
                "keras",
                "scikit-learn",
                "langchain",
                "langchain-architecture",
                "langchain-orchestration",
                "llamaindex",
                "openai",
                "gpt",
                "transformers",
                "bert",
                "rag",
                "llm",
            ],
        ),
        (
            SkillCategory::Databases,
            vec![
                "postgresql",
                "mysql",
                "mongodb",
                "redis",
                "elasticsearch",
                "oracle",
                "sql server",
                "firebase",
                "supabase",
                "dynamodb",
                "faiss",
                "pinecone",
                "weaviate",
                "chroma",
            ],
        ),
        (
            SkillCategory::CloudDevops,
            vec![
                "aws",
                "azure",
                "gcp",
                "docker",
                "kubernetes",
                "terraform",
                "ansible",
                "jenkins",
                "github actions",
                "gitlab ci",
                "nginx",
            ],
        ),
        (
            SkillCategory::Methodologies,
            vec!["agile", "scrum", "kanban", "devops", "ci/cd", "tdd", "bdd"],
        ),
        (
            SkillCategory::SoftSkills,
            vec![
                "liderazgo",
                "comunicacion",
                "trabajo en equipo",
                "resolucion de problemas",
                "gestion de proyectos",
                "mentoria",
                "presentaciones",
                "leadership",
                "communication",
                "teamwork",
                "problem solving",
                "project management",
                "mentoring",
                "presentations",
            ],
        ),
    ]
}
