//! Web server module

pub mod http;

use anyhow::{Context, Result};
use axum::{
    response::Html,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::assets;
use crate::config::Config;
use crate::schedule::TripSchedule;
use crate::store::BudgetStore;

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    /// Sequences read-modify-write of the single record; a completed write
    /// is fully visible to the next read
    pub store: Arc<Mutex<BudgetStore>>,
    pub schedule: TripSchedule,
}

/// Build the application router
pub fn router(state: ServerState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_page))
        .route(
            "/api/budget",
            get(http::budget_handler).put(http::update_budget_handler),
        )
        .route("/api/reset", post(http::reset_handler))
        .route("/api/status", get(http::status_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server
pub async fn start(host: &str, port: u16) -> Result<()> {
    let config = Config::load()?;
    let schedule = TripSchedule::from_config(&config.schedule)?;
    let store = BudgetStore::new(config.budget.default_amount())?;

    let static_dir = crate::config::static_dir()?;
    tokio::fs::create_dir_all(&static_dir)
        .await
        .context("Failed to create static directory")?;

    // Cache the mascot image before accepting requests; failures only warn
    let mascot = assets::cache_mascot_image(&config, &static_dir).await;

    let data_file = store.data_file().to_path_buf();
    let state = ServerState {
        config: Arc::new(config),
        store: Arc::new(Mutex::new(store)),
        schedule: schedule.clone(),
    };

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let app = router(state, &static_dir);

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("     Pantry Budget Starting");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("✓ Shopping days: {}", schedule);
    println!("✓ Budget file:   {}", data_file.display());
    match mascot {
        Some(path) => println!("✓ Mascot image:  {}", path.display()),
        None => println!("  Mascot image:  not configured"),
    }
    println!();
    println!("🚀 Listening on http://{}", addr);
    println!();

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}

/// Handler for the index page
async fn index_page() -> Html<&'static str> {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Pantry Budget</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 480px;
            margin: 0 auto;
            padding: 20px;
            background: #1a1a1a;
            color: #e0e0e0;
        }
        h1 { color: #4CAF50; text-align: center; }
        .mascot {
            display: block;
            margin: 0 auto 10px;
            max-height: 120px;
            border-radius: 8px;
        }
        .per-trip {
            background: #2a2a2a;
            padding: 25px;
            border-radius: 8px;
            margin: 20px 0;
            text-align: center;
        }
        .per-trip .amount {
            font-size: 3em;
            font-weight: bold;
            color: #4CAF50;
        }
        .per-trip .label { color: #999; }
        .stats {
            display: flex;
            gap: 10px;
            margin: 20px 0;
        }
        .stat {
            flex: 1;
            background: #2a2a2a;
            padding: 12px;
            border-radius: 8px;
            text-align: center;
        }
        .stat .value { font-size: 1.3em; font-weight: bold; }
        .stat .label { color: #999; font-size: 0.8em; }
        .controls { display: flex; gap: 10px; margin: 20px 0; }
        input[type=number] {
            flex: 1;
            padding: 10px;
            border-radius: 6px;
            border: 1px solid #444;
            background: #222;
            color: #e0e0e0;
            font-size: 1em;
        }
        button {
            padding: 10px 16px;
            border-radius: 6px;
            border: none;
            cursor: pointer;
            font-size: 1em;
        }
        button.update { background: #4CAF50; color: #fff; }
        button.reset { background: #444; color: #e0e0e0; }
        body.loading button { opacity: 0.5; pointer-events: none; }
        .toast {
            position: fixed;
            bottom: 20px;
            left: 50%;
            transform: translateX(-50%) translateY(80px);
            background: #2e7d32;
            color: #fff;
            padding: 10px 20px;
            border-radius: 6px;
            transition: transform 0.3s;
        }
        .toast.error { background: #c62828; }
        .toast.show { transform: translateX(-50%) translateY(0); }
    </style>
</head>
<body>
    <img class="mascot" src="/static/mascot.webp" alt=""
         onerror="this.style.display='none'">
    <h1>Pantry Budget</h1>

    <div class="per-trip">
        <div class="amount"><span id="perTrip">–</span> EUR</div>
        <div class="label">to spend per trip</div>
    </div>

    <div class="stats">
        <div class="stat">
            <div class="value" id="remainingBudget">–</div>
            <div class="label">remaining budget</div>
        </div>
        <div class="stat">
            <div class="value" id="remainingTrips">–</div>
            <div class="label">trips left this month</div>
        </div>
        <div class="stat">
            <div class="value" id="lastUpdated">–</div>
            <div class="label">last updated</div>
        </div>
    </div>

    <div class="controls">
        <input type="number" id="newBudget" min="0" step="0.01"
               placeholder="New remaining budget">
        <button class="update" id="updateBtn">Update</button>
        <button class="reset" id="resetBtn">Reset</button>
    </div>

    <script>
        const els = {
            perTrip: document.getElementById('perTrip'),
            remainingBudget: document.getElementById('remainingBudget'),
            remainingTrips: document.getElementById('remainingTrips'),
            lastUpdated: document.getElementById('lastUpdated'),
            newBudget: document.getElementById('newBudget'),
            updateBtn: document.getElementById('updateBtn'),
            resetBtn: document.getElementById('resetBtn'),
        };

        function toast(message, type = 'success') {
            const existing = document.querySelector('.toast');
            if (existing) existing.remove();

            const el = document.createElement('div');
            el.className = 'toast ' + type;
            el.textContent = message;
            document.body.appendChild(el);

            requestAnimationFrame(() => el.classList.add('show'));
            setTimeout(() => {
                el.classList.remove('show');
                setTimeout(() => el.remove(), 300);
            }, 2500);
        }

        function render(data) {
            els.perTrip.textContent = data.perTrip.toFixed(2);
            els.remainingBudget.textContent = data.remainingBudget.toFixed(2) + ' EUR';
            els.remainingTrips.textContent = data.remainingTrips;
            els.lastUpdated.textContent = new Date(data.lastUpdated)
                .toLocaleDateString('de-DE', {
                    day: '2-digit', month: '2-digit', year: 'numeric',
                    hour: '2-digit', minute: '2-digit',
                });
        }

        async function call(url, options, failMessage) {
            try {
                document.body.classList.add('loading');
                const response = await fetch(url, options);
                if (!response.ok) throw new Error(failMessage);
                render(await response.json());
                return true;
            } catch (err) {
                console.error(err);
                toast(failMessage, 'error');
                return false;
            } finally {
                document.body.classList.remove('loading');
            }
        }

        function refresh() {
            call('/api/budget', undefined, 'Failed to load budget');
        }

        els.updateBtn.addEventListener('click', async () => {
            const amount = parseFloat(els.newBudget.value);
            if (isNaN(amount) || amount < 0) {
                toast('Please enter a valid amount', 'error');
                return;
            }
            const ok = await call('/api/budget', {
                method: 'PUT',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ remainingBudget: amount }),
            }, 'Failed to update budget');
            if (ok) {
                toast('Budget updated');
                els.newBudget.value = '';
            }
        });

        els.newBudget.addEventListener('keypress', (e) => {
            if (e.key === 'Enter') els.updateBtn.click();
        });

        els.resetBtn.addEventListener('click', async () => {
            if (!confirm('Reset the budget to its default?')) return;
            const ok = await call('/api/reset', { method: 'POST' },
                'Failed to reset budget');
            if (ok) toast('Budget reset');
        });

        refresh();
        setInterval(refresh, 30000);
    </script>
</body>
</html>"#)
}
