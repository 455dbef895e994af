use crate::config::Panels;
use crate::models::{DashboardSnapshot, StreamButton};

pub fn render_index(snapshot: &DashboardSnapshot) -> String {
    let analytics = match snapshot.panels {
        Panels::Full => ANALYTICS_HTML
            .replace("{{STATS}}", &snapshot.view.stats_display.markup())
            .replace("{{SNAPSHOT}}", &snapshot_note(snapshot))
            .replace("{{RANGE_OPTIONS}}", &range_options(snapshot))
            .replace(
                "{{LAST_INTERACTION}}",
                &escape_html(&snapshot.view.last_interaction),
            )
            .replace(
                "{{TIME_SINCE}}",
                &escape_html(&snapshot.view.time_since_last_interaction),
            ),
        Panels::ToggleOnly => String::new(),
    };

    let feed = if snapshot.is_streaming {
        FEED_HTML.replace("{{FEED_URL}}", &escape_html(&snapshot.video_feed_url))
    } else {
        String::new()
    };

    INDEX_HTML
        .replace("{{BUTTON_STYLE}}", &button_style(&snapshot.view.stream_button))
        .replace("{{BUTTON_LABEL}}", snapshot.view.stream_button.label)
        .replace("{{FEED}}", &feed)
        .replace("{{ANALYTICS}}", &analytics)
}

fn range_options(snapshot: &DashboardSnapshot) -> String {
    let mut ranges = snapshot.ranges.clone();
    if !ranges.contains(&snapshot.selected_range) {
        ranges.push(snapshot.selected_range.clone());
    }

    ranges
        .iter()
        .map(|range| {
            let selected = if *range == snapshot.selected_range {
                " selected"
            } else {
                ""
            };
            let value = escape_html(range);
            format!(r#"<option value="{value}"{selected}>{}</option>"#, capitalize(&value))
        })
        .collect::<Vec<_>>()
        .join("\n            ")
}

fn snapshot_note(snapshot: &DashboardSnapshot) -> String {
    match snapshot.loaded_at {
        Some(at) => format!("Snapshot taken {}", at.format("%Y-%m-%d %H:%M:%S")),
        None => String::new(),
    }
}

fn button_style(button: &StreamButton) -> String {
    let mut style = String::new();
    if let Some(background) = button.background {
        style.push_str(&format!("background-color: {background};"));
    }
    if let Some(color) = button.color {
        style.push_str(&format!(" color: {color};"));
    }
    if style.is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, style.trim())
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            // Braces would otherwise be read as template placeholders.
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const ANALYTICS_HTML: &str = r#"<section class="card">
      <div class="card-header">
        <h2>Detections</h2>
        <form method="post" action="/range">
          <select id="analytics-range" name="range" onchange="this.form.submit()">
            {{RANGE_OPTIONS}}
          </select>
          <noscript><button class="btn-small" type="submit">Show</button></noscript>
        </form>
      </div>
      <div id="stats-display" class="stats">{{STATS}}</div>
      <p class="hint">{{SNAPSHOT}}</p>
    </section>

    <section class="card panel">
      <div class="stat">
        <span class="label">Last interaction</span>
        <span id="last-interaction" class="value">{{LAST_INTERACTION}}</span>
      </div>
      <div class="stat">
        <span class="label">Time since last interaction</span>
        <span id="time-since-last-interaction" class="value">{{TIME_SINCE}}</span>
      </div>
    </section>"#;

const FEED_HTML: &str = r#"<img class="feed" src="{{FEED_URL}}" alt="Live feed" />"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Detection Dashboard</title>
  <style>
    :root {
      --bg: #eef3f6;
      --ink: #1f2a30;
      --muted: #6b7780;
      --accent: #2f4858;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(47, 72, 88, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #dde8ee);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(760px, 100%);
      display: grid;
      gap: 20px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    h2 {
      margin: 0;
      font-size: 1.2rem;
    }

    .card {
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 24px;
      display: grid;
      gap: 14px;
    }

    .card-header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .panel {
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      display: block;
      font-size: 1.3rem;
      font-weight: 600;
      color: var(--accent);
    }

    .stats {
      line-height: 1.8;
      min-height: 1.8em;
    }

    select {
      font: inherit;
      padding: 6px 10px;
      border-radius: 10px;
    }

    #streamButton {
      appearance: none;
      border: 2px solid var(--accent);
      border-radius: 999px;
      padding: 14px 20px;
      font-size: 1rem;
      font-weight: 600;
      background: white;
      color: var(--accent);
      cursor: pointer;
      width: 100%;
    }

    .feed {
      width: 100%;
      border-radius: 14px;
    }

    .hint {
      margin: 0;
      color: var(--muted);
      font-size: 0.85rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Detection Dashboard</h1>
    </header>

    {{ANALYTICS}}

    <section class="card">
      <form method="post" action="/stream/toggle">
        <button id="streamButton" type="submit"{{BUTTON_STYLE}}>{{BUTTON_LABEL}}</button>
      </form>
      {{FEED}}
    </section>
  </main>
</body>
</html>
"#;
