//! Static provider catalog: display names and fallback categories.

/// Fallback category for providers absent from the table.
pub const OTHER_CATEGORY: &str = "Other";

const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("gmail", "Gmail"),
    ("googlesheets", "Google Sheets"),
    ("googledrive", "Google Drive"),
    ("googlecalendar", "Google Calendar"),
    ("slack", "Slack"),
    ("discord", "Discord"),
    ("github", "GitHub"),
    ("gitlab", "GitLab"),
    ("trello", "Trello"),
    ("asana", "Asana"),
    ("notion", "Notion"),
    ("hubspot", "HubSpot"),
    ("salesforce", "Salesforce"),
    ("zendesk", "Zendesk"),
    ("intercom", "Intercom"),
    ("stripe", "Stripe"),
    ("paypal", "PayPal"),
    ("dropbox", "Dropbox"),
    ("onedrive", "OneDrive"),
    ("zoom", "Zoom"),
    ("teams", "Microsoft Teams"),
    ("linear", "Linear"),
    ("figma", "Figma"),
    ("airtable", "Airtable"),
];

const CATEGORIES: &[(&str, &[&str])] = &[
    // Communication
    ("slack", &["Communication", "Team Collaboration"]),
    ("discord", &["Communication", "Gaming"]),
    ("teams", &["Communication", "Microsoft", "Video Conferencing"]),
    ("zoom", &["Communication", "Video Conferencing"]),
    // Email
    ("gmail", &["Email", "Google", "Communication"]),
    ("outlook", &["Email", "Microsoft", "Communication"]),
    // Productivity
    ("notion", &["Productivity", "Note Taking", "Collaboration"]),
    ("airtable", &["Productivity", "Database", "Collaboration"]),
    ("trello", &["Productivity", "Project Management"]),
    ("asana", &["Productivity", "Project Management"]),
    ("linear", &["Productivity", "Project Management", "Development"]),
    // Development
    ("github", &["Development", "Version Control", "Code"]),
    ("gitlab", &["Development", "Version Control", "Code"]),
    ("figma", &["Development", "Design", "Collaboration"]),
    // Google Workspace
    ("googlesheets", &["Google", "Spreadsheet", "Productivity"]),
    ("googledrive", &["Google", "Storage", "File Management"]),
    ("googlecalendar", &["Google", "Calendar", "Scheduling"]),
    // CRM & sales
    ("hubspot", &["CRM", "Sales", "Marketing"]),
    ("salesforce", &["CRM", "Sales", "Enterprise"]),
    // Support
    ("zendesk", &["Support", "Customer Service"]),
    ("intercom", &["Support", "Customer Service", "Communication"]),
    // Payment
    ("stripe", &["Payment", "Financial", "E-commerce"]),
    ("paypal", &["Payment", "Financial", "E-commerce"]),
    // Storage
    ("dropbox", &["Storage", "File Management"]),
    ("onedrive", &["Storage", "File Management", "Microsoft"]),
];

fn lookup<'a, T: Copy>(table: &'a [(&'a str, T)], slug: &str) -> Option<T> {
    let slug = slug.to_lowercase();
    table
        .iter()
        .find(|(key, _)| *key == slug)
        .map(|(_, value)| *value)
}

/// Resolve a provider's categories. Vendor categories win when present.
pub fn categorize(provider: &str, vendor_categories: &[String]) -> Vec<String> {
    if !vendor_categories.is_empty() {
        return vendor_categories.to_vec();
    }
    match lookup(CATEGORIES, provider) {
        Some(categories) => categories.iter().map(|c| c.to_string()).collect(),
        None => vec![OTHER_CATEGORY.to_string()],
    }
}

/// Human-readable provider name; unknown slugs are title-cased.
pub fn display_name(provider: &str) -> String {
    match lookup(DISPLAY_NAMES, provider) {
        Some(name) => name.to_string(),
        None => title_case(provider),
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// snake_case key for a category display name.
pub fn category_key(display_name: &str) -> String {
    display_name.to_lowercase().replace(' ', "_")
}
