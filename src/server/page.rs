//! HTML page served at `/`
//!
//! One link and one `<audio>` element per library entry, plus a small client
//! script. The poll script asks `/playlist/` every 100 ms and plays anything
//! newer than what it already played; the push script keeps a WebSocket on
//! `/ws` and plays each pushed name in turn.

use crate::library::Library;

use super::config::DeliveryMode;

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Jukebox</title>
<style>
	body { background-color: #333; color: #ccc; }
	#selections { padding-left: 0; }
	#selections .selection { display: inline-block; padding: .25em .5em; }
	#selections .play { color: #8f8; }
</style>
</head>
<body>
<h1>Jukebox</h1>
<p>Play sounds for everyone who has this page loaded!</p>
"#;

const POLL_SCRIPT: &str = r#"<script>
(function() {
	"use strict";
	Array.from(document.getElementsByClassName("play")).forEach((e) => e.addEventListener("click", function(event) {
		event.preventDefault();
		fetch("/play/" + encodeURIComponent(e.dataset.sound), { method: "POST" });
	}, false));

	window.setInterval(function() {
		fetch("/playlist/")
			.then(function(response) {
				if (response.ok) { return response.json(); }
				throw new Error(response.statusText);
			})
			.then(function(data) {
				for (const val of data) {
					const audio = document.getElementById("audio_" + val.resource);
					if (audio && val.timestamp > Number(audio.dataset.timestamp)) {
						audio.dataset.timestamp = val.timestamp;
						audio.play();
					}
				}
			})
			.catch(function(e) { console.log(e); });
	}, 100);
})();
</script>
"#;

const PUSH_SCRIPT: &str = r#"<div id="log"></div>
<script>
(function() {
	"use strict";
	const log = document.getElementById("log");
	function appendLog(html) {
		const item = document.createElement("div");
		item.innerHTML = html;
		log.appendChild(item);
	}
	if (!window["WebSocket"]) {
		appendLog("<b>Your browser does not support WebSockets.</b>");
		return;
	}

	const queue = [];
	let current = null;
	window.setInterval(function() {
		if (current === null && queue.length > 0) {
			const audio = document.getElementById("audio_" + queue.shift());
			if (audio) {
				current = audio;
				audio.onended = function() { current = null; };
				audio.play().catch(function() { current = null; });
			}
		}
	}, 100);

	const scheme = document.location.protocol === "https:" ? "wss://" : "ws://";
	const conn = new WebSocket(scheme + document.location.host + "/ws");
	conn.onclose = function() { appendLog("<b>Connection closed.</b>"); };
	conn.onmessage = function(evt) {
		for (const name of evt.data.split("\n")) { queue.push(name); }
	};

	Array.from(document.getElementsByClassName("play")).forEach((e) => e.addEventListener("click", function(event) {
		event.preventDefault();
		conn.send(e.dataset.sound);
	}, false));
})();
</script>
"#;

const TAIL: &str = "</body>\n</html>\n";

/// Render the page for a library
pub fn render(library: &Library, delivery: DeliveryMode) -> String {
    let mut html = String::from(HEAD);

    html.push_str("<ul id=\"selections\">\n");
    for name in library.names() {
        let name_attr = htmlescape::encode_attribute(name);
        let name_text = htmlescape::encode_minimal(name);
        let uri_attr = htmlescape::encode_attribute(library.uri(name).unwrap_or_default());

        html.push_str(&format!(
            "<li class=\"selection\">\
             <a class=\"play\" data-sound=\"{name_attr}\" href=\"#\">{name_text}</a>\
             <audio preload=\"auto\" src=\"{uri_attr}\" id=\"audio_{name_attr}\" data-timestamp=\"0\">\
             Your browser does not support the <code>audio</code> element.</audio>\
             </li>\n"
        ));
    }
    html.push_str("</ul>\n");

    html.push_str(match delivery {
        DeliveryMode::Poll => POLL_SCRIPT,
        DeliveryMode::Push => PUSH_SCRIPT,
    });
    html.push_str(TAIL);

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Library {
        Library::from_iter([
            ("deeper", "/sounds/deeper.mp3"),
            ("56k", "/sounds/56k.mp3"),
        ])
    }

    #[test]
    fn test_lists_entries_in_sorted_order() {
        let html = render(&library(), DeliveryMode::Poll);

        let first = html.find("data-sound=\"56k\"").unwrap();
        let second = html.find("data-sound=\"deeper\"").unwrap();
        assert!(first < second);
        let uri = htmlescape::encode_attribute("/sounds/56k.mp3");
        assert!(html.contains(&format!("src=\"{uri}\" id=\"audio_56k\"")));
    }

    #[test]
    fn test_poll_mode_script() {
        let html = render(&library(), DeliveryMode::Poll);

        assert!(html.contains("fetch(\"/playlist/\")"));
        assert!(!html.contains("new WebSocket"));
    }

    #[test]
    fn test_push_mode_script() {
        let html = render(&library(), DeliveryMode::Push);

        assert!(html.contains("new WebSocket"));
        assert!(!html.contains("fetch(\"/playlist/\")"));
    }

    #[test]
    fn test_names_are_escaped() {
        let name = "<b>\"loud\"</b>";
        let library = Library::from_iter([(name, "/sounds/a&b.mp3")]);
        let html = render(&library, DeliveryMode::Poll);

        assert!(html.contains(&format!(
            "data-sound=\"{}\"",
            htmlescape::encode_attribute(name)
        )));
        assert!(html.contains(&format!(">{}</a>", htmlescape::encode_minimal(name))));
        assert!(html.contains(&htmlescape::encode_attribute("/sounds/a&b.mp3")));
        assert!(!html.contains(name));
        assert!(!html.contains("a&b.mp3"));
    }

    #[test]
    fn test_empty_library() {
        let html = render(&Library::default(), DeliveryMode::Push);

        assert!(html.contains("<ul id=\"selections\">\n</ul>"));
        assert!(html.ends_with("</html>\n"));
    }
}
