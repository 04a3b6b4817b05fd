//! Configuration module

mod site;

pub use site::BlogConfig;
pub use site::ContactFormConfig;
pub use site::ContactMethodConfig;
pub use site::FooterConfig;
pub use site::FormOption;
pub use site::HighlightConfig;
pub use site::LinkGroup;
pub use site::MenuItem;
pub use site::OfficeConfig;
pub use site::ServiceConfig;
pub use site::SiteConfig;
pub use site::ValueConfig;
