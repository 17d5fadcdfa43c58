// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod get;
mod post;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use portpicker::pick_unused_port;
    use reqwest::StatusCode;
    use serde_json::Value;
    use serde_json::json;
    use tokio::net::TcpStream;
    use tokio::spawn;
    use tokio::time::sleep;

    use crate::config::Config;
    use crate::drill::server::ServerOptions;
    use crate::drill::server::start_server;
    use crate::error::ErrorReport;
    use crate::error::Fallible;

    /// Start a server on a free port and wait until it accepts connections.
    async fn start(config: Config) -> Fallible<String> {
        let port = pick_unused_port().ok_or_else(|| ErrorReport::new("no free port"))?;
        let options = ServerOptions {
            port,
            seed: Some(1),
            open_browser: false,
        };
        spawn(async move { start_server(config, options).await });
        let addr = format!("127.0.0.1:{port}");
        loop {
            if let Ok(stream) = TcpStream::connect(&addr).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
        Ok(format!("http://{addr}"))
    }

    fn config(count: usize) -> Config {
        Config {
            count,
            ..Config::default()
        }
    }

    async fn post(base: &str, form: &[(&str, &str)]) -> Fallible<String> {
        let response = reqwest::Client::new()
            .post(format!("{base}/"))
            .form(form)
            .send()
            .await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        Ok(response.text().await?)
    }

    async fn export(base: &str) -> Fallible<Value> {
        let response = reqwest::get(format!("{base}/export.json")).await?;
        assert!(response.status().is_success());
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let options = ServerOptions {
            port: 0,
            seed: None,
            open_browser: false,
        };
        let result = start_server(config(0), options).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "error: count must be positive."
        );
    }

    #[tokio::test]
    async fn test_static_endpoints() -> Fallible<()> {
        let base = start(config(2)).await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("{base}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the not found endpoint.
        let response = reqwest::get(format!("{base}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the export endpoint.
        let response = reqwest::get(format!("{base}/export.json")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(
            response.headers().get("content-disposition").unwrap(),
            "attachment; filename=\"math_session.json\""
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_root() -> Fallible<()> {
        let base = start(config(2)).await?;
        let response = reqwest::get(format!("{base}/")).await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Arithmetic Drill"));
        for id in ["addition-2", "subtraction-1", "multiplication-2", "division-1"] {
            assert!(html.contains(id));
        }
        assert!(html.contains("Page 1 of 1"));
        assert!(html.contains("0 / 8 attempted"));
        Ok(())
    }

    #[tokio::test]
    async fn test_check() -> Fallible<()> {
        let base = start(config(2)).await?;
        let value = export(&base).await?;
        let answer = value["problems"]["addition"][0]["answer"].as_u64().unwrap();
        let correct = answer.to_string();

        // Invalid input is reported inline and not recorded.
        let html = post(
            &base,
            &[("action", "Check"), ("problem", "addition-1"), ("answer", "abc")],
        )
        .await?;
        assert!(html.contains("invalid number"));
        let value = export(&base).await?;
        assert_eq!(value["metadata"]["attempted"], json!(0));
        assert_eq!(value["performance"]["attempts"], json!({}));

        // A correct answer.
        let html = post(
            &base,
            &[
                ("action", "Check"),
                ("problem", "addition-1"),
                ("answer", correct.as_str()),
            ],
        )
        .await?;
        assert!(html.contains(">Correct<"));
        assert!(!html.contains("invalid number"));

        // A wrong answer to another problem.
        let wrong = (answer + 1).to_string();
        let html = post(
            &base,
            &[("action", "Check"), ("problem", "addition-2"), ("answer", wrong.as_str())],
        )
        .await?;
        assert!(html.contains(">Incorrect<"));

        // Re-checking does not count twice.
        post(
            &base,
            &[("action", "Check"), ("problem", "addition-2"), ("answer", wrong.as_str())],
        )
        .await?;

        let value = export(&base).await?;
        assert_eq!(value["metadata"]["attempted"], json!(2));
        assert_eq!(value["metadata"]["correct"], json!(1));
        assert_eq!(
            value["metadata"]["categories"]["addition"],
            json!({"problems": 2, "attempted": 2, "correct": 1})
        );
        assert_eq!(
            value["performance"]["attempts"]["addition-1"]["correct"],
            json!(true)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_problem() -> Fallible<()> {
        let base = start(config(2)).await?;
        let html = post(
            &base,
            &[("action", "Check"), ("problem", "addition-9"), ("answer", "1")],
        )
        .await?;
        assert!(html.contains("no problem with identifier addition-9."));
        Ok(())
    }

    #[tokio::test]
    async fn test_reveal_and_hide() -> Fallible<()> {
        let base = start(config(2)).await?;
        let html = post(&base, &[("action", "Reveal"), ("problem", "division-2")]).await?;
        assert!(html.contains("Answer: "));
        let value = export(&base).await?;
        assert_eq!(value["performance"]["revealed"], json!(["division-2"]));
        assert_eq!(value["metadata"]["attempted"], json!(0));

        let html = post(&base, &[("action", "Hide"), ("problem", "division-2")]).await?;
        assert!(!html.contains("Answer: "));
        let value = export(&base).await?;
        assert_eq!(value["performance"]["revealed"], json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_replaces_session() -> Fallible<()> {
        let base = start(config(2)).await?;
        post(
            &base,
            &[("action", "Check"), ("problem", "addition-1"), ("answer", "1")],
        )
        .await?;
        post(&base, &[("action", "Reveal"), ("problem", "addition-2")]).await?;

        let html = post(
            &base,
            &[
                ("action", "Generate"),
                ("count", "3"),
                ("category", "division"),
            ],
        )
        .await?;
        assert!(html.contains("division-3"));
        assert!(!html.contains("addition-1"));

        let value = export(&base).await?;
        assert_eq!(value["metadata"]["totalProblems"], json!(3));
        assert_eq!(value["metadata"]["attempted"], json!(0));
        assert_eq!(value["performance"]["revealed"], json!([]));
        let problems = value["problems"].as_object().unwrap();
        assert_eq!(problems.len(), 1);
        for problem in value["problems"]["division"].as_array().unwrap() {
            let dividend = problem["operand1"].as_u64().unwrap();
            let divisor = problem["operand2"].as_u64().unwrap();
            let quotient = problem["answer"].as_u64().unwrap();
            assert_eq!(dividend, divisor * quotient);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_rejects_zero_count() -> Fallible<()> {
        let base = start(config(2)).await?;
        let html = post(
            &base,
            &[("action", "Generate"), ("count", "0"), ("category", "all")],
        )
        .await?;
        assert!(html.contains("count must be positive."));
        // The old session is kept.
        let value = export(&base).await?;
        assert_eq!(value["metadata"]["totalProblems"], json!(8));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_rejects_huge_count() -> Fallible<()> {
        let base = start(config(2)).await?;
        for count in ["10001", "18446744073709551615"] {
            let html = post(
                &base,
                &[("action", "Generate"), ("count", count), ("category", "all")],
            )
            .await?;
            assert!(html.contains("count must be at most 10000."));
        }
        // The server still answers and the old session is kept.
        let response = reqwest::get(format!("{base}/")).await?;
        assert_eq!(response.status(), StatusCode::OK);
        let value = export(&base).await?;
        assert_eq!(value["metadata"]["totalProblems"], json!(8));
        Ok(())
    }

    #[tokio::test]
    async fn test_pagination() -> Fallible<()> {
        let config = Config {
            count: 2,
            page_size: 3,
            ..Config::default()
        };
        let base = start(config).await?;
        let html = post(&base, &[("action", "Previous")]).await?;
        assert!(html.contains("Page 1 of 3"));
        let html = post(&base, &[("action", "Next")]).await?;
        assert!(html.contains("Page 2 of 3"));
        post(&base, &[("action", "Next")]).await?;
        let html = post(&base, &[("action", "Next")]).await?;
        assert!(html.contains("Page 3 of 3"));
        assert!(html.contains("division-2"));
        assert!(!html.contains("addition-1"));
        Ok(())
    }
}
