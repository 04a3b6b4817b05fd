//! Site configuration (site.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub author: String,
    pub language: String,
    pub locale: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Contact details shown in header and footer
    pub phone: String,
    pub phone_display: String,
    pub email: String,
    pub service_area: String,

    // Directory
    pub content_dir: String,
    pub static_dir: String,
    pub public_dir: String,

    pub blog: BlogConfig,
    pub highlight: HighlightConfig,

    // Shared layout
    pub nav: Vec<MenuItem>,
    pub footer: FooterConfig,

    // Marketing content
    pub services: Vec<ServiceConfig>,
    pub values: Vec<ValueConfig>,
    pub contact_methods: Vec<ContactMethodConfig>,
    pub offices: Vec<OfficeConfig>,
    pub contact: ContactFormConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Diné Insurance".to_string(),
            tagline: "Protecting What Matters. Honoring Who You Are.".to_string(),
            description: "Trusted, culturally respectful insurance solutions for the Diné people, \
                          preserving family, land, and livelihood through personalized service \
                          rooted in Navajo values."
                .to_string(),
            keywords: vec![
                "Navajo insurance".to_string(),
                "Diné insurance".to_string(),
                "homeowners insurance".to_string(),
                "auto insurance".to_string(),
                "business insurance".to_string(),
            ],
            author: "Diné Insurance".to_string(),
            language: "en".to_string(),
            locale: "en_US".to_string(),
            timezone: "America/Phoenix".to_string(),

            url: "https://dine-insurance.netlify.app".to_string(),
            root: "/".to_string(),

            phone: "1-800-346-3365".to_string(),
            phone_display: "1-800-DINE-365".to_string(),
            email: "protect@dineinsurance.com".to_string(),
            service_area: "Serving Navajo Nation and surrounding communities".to_string(),

            content_dir: "content".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            blog: BlogConfig::default(),
            highlight: HighlightConfig::default(),

            nav: default_nav(),
            footer: FooterConfig::default(),

            services: default_services(),
            values: default_values(),
            contact_methods: default_contact_methods(),
            offices: default_offices(),
            contact: ContactFormConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Resolve the configured timezone, falling back to UTC
    pub fn tz(&self) -> chrono_tz::Tz {
        match self.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                if !self.timezone.is_empty() {
                    tracing::warn!("Unknown timezone {:?}, using UTC", self.timezone);
                }
                chrono_tz::UTC
            }
        }
    }

    /// Format a page title with the site-wide "%s | Site" template
    pub fn page_title(&self, title: &str) -> String {
        if title.is_empty() {
            format!("{} | {}", self.title, self.tagline)
        } else {
            format!("{} | {}", title, self.title)
        }
    }
}

/// Blog pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Directory holding posts, relative to `content_dir`
    pub dir: String,
    /// Posts per blog index page
    pub per_page: usize,
    /// How many featured posts the blog index shows
    pub featured_limit: usize,
    /// How many latest posts the home page shows
    pub home_limit: usize,
    pub words_per_minute: usize,
    pub default_author: String,
    pub default_category: String,
    pub render_drafts: bool,
    /// Glob patterns (matched against file names) to skip
    pub exclude: Vec<String>,
    pub feed_limit: usize,
    pub toc_depth: usize,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            dir: "blog".to_string(),
            per_page: 6,
            featured_limit: 3,
            home_limit: 3,
            words_per_minute: 200,
            default_author: "Diné Insurance Team".to_string(),
            default_category: "Insurance".to_string(),
            render_drafts: false,
            exclude: Vec::new(),
            feed_limit: 20,
            toc_depth: 3,
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "InspiredGitHub".to_string(),
            line_number: false,
        }
    }
}

/// A navigation link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

impl MenuItem {
    fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

/// Footer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub about: String,
    pub groups: Vec<LinkGroup>,
}

/// A titled column of footer links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkGroup {
    pub title: String,
    pub links: Vec<MenuItem>,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            about: "Walking Beside You on the Path of Hózhó. Protecting Diné families and \
                    businesses with insurance solutions rooted in Navajo values of trust, \
                    harmony, and resilience."
                .to_string(),
            groups: vec![
                LinkGroup {
                    title: "Services".to_string(),
                    links: vec![
                        MenuItem::new("Homeowners Insurance", "/services/#homeowners"),
                        MenuItem::new("Auto Insurance", "/services/#auto"),
                        MenuItem::new("Business Insurance", "/services/#business"),
                        MenuItem::new("Life Insurance", "/services/#life"),
                    ],
                },
                LinkGroup {
                    title: "Company".to_string(),
                    links: vec![
                        MenuItem::new("About Us", "/about/"),
                        MenuItem::new("Our Values", "/about/#values"),
                        MenuItem::new("Blog", "/blog/"),
                        MenuItem::new("Contact", "/contact/"),
                    ],
                },
                LinkGroup {
                    title: "Legal".to_string(),
                    links: vec![
                        MenuItem::new("Privacy Policy", "/privacy-policy/"),
                        MenuItem::new("Terms of Service", "/terms-of-service/"),
                        MenuItem::new("Licensing", "/licensing/"),
                        MenuItem::new("Accessibility", "/accessibility/"),
                    ],
                },
            ],
        }
    }
}

fn default_nav() -> Vec<MenuItem> {
    vec![
        MenuItem::new("Home", "/"),
        MenuItem::new("Services", "/services/"),
        MenuItem::new("About", "/about/"),
        MenuItem::new("Blog", "/blog/"),
        MenuItem::new("Contact", "/contact/"),
    ]
}

/// An insurance line offered by the brokerage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Anchor id on the services page
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

fn default_services() -> Vec<ServiceConfig> {
    let service = |id: &str, title: &str, description: &str, features: &[&str]| ServiceConfig {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
    };
    vec![
        service(
            "homeowners",
            "Homeowners Insurance",
            "Protect your home and family with comprehensive coverage designed for \
             traditional and modern dwellings on or off the reservation.",
            &["Dwelling protection", "Personal property", "Liability coverage"],
        ),
        service(
            "auto",
            "Auto Insurance",
            "Reliable vehicle protection that understands the unique driving needs and \
             conditions of Navajo Nation communities.",
            &["Liability", "Collision & comprehensive", "Roadside assistance"],
        ),
        service(
            "business",
            "Business Insurance",
            "Support Diné-owned enterprises with tailored business insurance covering \
             retail, hospitality, crafts, and traditional ventures.",
            &["General liability", "Commercial property", "Workers' compensation"],
        ),
        service(
            "life",
            "Life Insurance",
            "Provide for the generations that follow with life coverage that honors \
             your family's future.",
            &["Term life", "Whole life", "Final expense"],
        ),
    ]
}

/// A cultural value presented on the home and about pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueConfig {
    pub name: String,
    pub meaning: String,
    pub description: String,
}

fn default_values() -> Vec<ValueConfig> {
    let value = |name: &str, meaning: &str, description: &str| ValueConfig {
        name: name.to_string(),
        meaning: meaning.to_string(),
        description: description.to_string(),
    };
    vec![
        value(
            "Hózhó",
            "Harmony & Balance",
            "Coverage that keeps your household in balance when the unexpected happens.",
        ),
        value(
            "K'é",
            "Kinship & Respect",
            "We treat every client as a relative, with patience and respect.",
        ),
        value(
            "Trust & Protection",
            "Standing beside you",
            "Clear answers and dependable claims support for the long road.",
        ),
    ]
}

/// A way of reaching the brokerage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMethodConfig {
    pub title: String,
    pub primary: String,
    #[serde(default)]
    pub secondary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub available: String,
    #[serde(default)]
    pub href: Option<String>,
}

fn default_contact_methods() -> Vec<ContactMethodConfig> {
    vec![
        ContactMethodConfig {
            title: "Phone".to_string(),
            primary: "1-800-DINE-365".to_string(),
            secondary: "(1-800-346-3365)".to_string(),
            description: "Speak with a Diné insurance specialist".to_string(),
            available: "Monday-Friday, 8 AM - 6 PM MST".to_string(),
            href: Some("tel:1-800-346-3365".to_string()),
        },
        ContactMethodConfig {
            title: "Email".to_string(),
            primary: "protect@dineinsurance.com".to_string(),
            secondary: "quotes@dineinsurance.com".to_string(),
            description: "Get detailed information and quotes".to_string(),
            available: "Response within 24 hours".to_string(),
            href: Some("mailto:protect@dineinsurance.com".to_string()),
        },
        ContactMethodConfig {
            title: "Service Area".to_string(),
            primary: "Navajo Nation".to_string(),
            secondary: "Surrounding communities".to_string(),
            description: "Mobile agents available".to_string(),
            available: "Arizona, New Mexico, Utah".to_string(),
            href: None,
        },
    ]
}

/// A physical office location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficeConfig {
    pub name: String,
    /// Multi-line address, one line per entry
    pub address: Vec<String>,
    pub phone: String,
    pub hours: Vec<String>,
}

fn default_offices() -> Vec<OfficeConfig> {
    let office = |name: &str, street: &str, city: &str, phone: &str| OfficeConfig {
        name: name.to_string(),
        address: vec![street.to_string(), city.to_string()],
        phone: phone.to_string(),
        hours: vec![
            "Mon-Fri: 8 AM - 5 PM".to_string(),
            "Sat: 9 AM - 2 PM".to_string(),
        ],
    };
    vec![
        office(
            "Window Rock Office",
            "123 Navajo Route 12",
            "Window Rock, AZ 86515",
            "(928) 871-4000",
        ),
        office(
            "Shiprock Office",
            "456 Main Street",
            "Shiprock, NM 87420",
            "(505) 368-4000",
        ),
        office(
            "Chinle Office",
            "789 Navajo Route 7",
            "Chinle, AZ 86503",
            "(928) 674-4000",
        ),
    ]
}

/// Quote request form configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFormConfig {
    /// Where the form posts to
    pub form_action: String,
    /// Path the server redirects to after an accepted request
    pub thanks_path: String,
    pub interests: Vec<FormOption>,
    pub referrals: Vec<FormOption>,
}

/// A `<select>` option
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormOption {
    pub value: String,
    pub label: String,
}

impl FormOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

impl Default for ContactFormConfig {
    fn default() -> Self {
        Self {
            form_action: "/contact".to_string(),
            thanks_path: "/contact/thanks/".to_string(),
            interests: vec![
                FormOption::new("homeowners", "Homeowners Insurance"),
                FormOption::new("auto", "Auto Insurance"),
                FormOption::new("business", "Business Insurance"),
                FormOption::new("life", "Life Insurance"),
                FormOption::new("multiple", "Multiple Services"),
                FormOption::new("other", "Other"),
            ],
            referrals: vec![
                FormOption::new("referral", "Family/Friend Referral"),
                FormOption::new("community", "Community Event"),
                FormOption::new("online", "Online Search"),
                FormOption::new("social", "Social Media"),
                FormOption::new("radio", "Radio Advertisement"),
                FormOption::new("other", "Other"),
            ],
        }
    }
}
