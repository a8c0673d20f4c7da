use crate::models::TrackerData;

pub fn render_index(date: &str, data: &TrackerData) -> String {
    let done = data.checked.get(date).map(Vec::as_slice).unwrap_or(&[]);
    INDEX_HTML
        .replace("{{DATE}}", date)
        .replace("{{SCORE}}", &data.score.to_string())
        .replace("{{HABIT_CHECKLIST}}", &render_checklist(data, done))
        .replace("{{HABIT_OPTIONS}}", &render_options(data.habits.keys()))
        .replace("{{REWARD_LIST}}", &render_reward_list(data))
        .replace("{{REWARD_OPTIONS}}", &render_options(data.rewards.keys()))
}

fn render_checklist(data: &TrackerData, done: &[String]) -> String {
    if data.habits.is_empty() {
        return r#"<p class="hint">No habits yet. Add one in the panel below.</p>"#.to_string();
    }
    let mut rows = String::new();
    for (name, points) in &data.habits {
        let escaped = escape_html(name);
        if done.contains(name) {
            rows.push_str(&format!(
                r#"<label class="habit done"><input type="checkbox" checked disabled /><span class="habit-name">{escaped}</span><span class="points">+{points}</span><span class="tag">done</span></label>"#
            ));
        } else {
            rows.push_str(&format!(
                r#"<label class="habit"><input type="checkbox" name="habit" value="{escaped}" /><span class="habit-name">{escaped}</span><span class="points">+{points}</span></label>"#
            ));
        }
        rows.push('\n');
    }
    rows
}

fn render_options<'a>(names: impl Iterator<Item = &'a String>) -> String {
    let mut options = String::new();
    for name in names {
        let escaped = escape_html(name);
        options.push_str(&format!(r#"<option value="{escaped}">{escaped}</option>"#));
        options.push('\n');
    }
    options
}

fn render_reward_list(data: &TrackerData) -> String {
    if data.rewards.is_empty() {
        return r#"<p class="hint">No rewards yet. Add something worth saving for.</p>"#.to_string();
    }
    let mut rows = String::new();
    for (name, cost) in &data.rewards {
        let escaped = escape_html(name);
        rows.push_str(&format!(
            r#"<li class="reward"><span class="reward-name">{escaped}</span><span class="cost">{cost} pts</span><form class="redeem-form" method="post" action="/redeem"><input type="hidden" name="name" value="{escaped}" /><button type="submit">Redeem</button></form></li>"#
        ));
        rows.push('\n');
    }
    format!("<ul class=\"rewards\">\n{rows}</ul>")
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit &amp; Reward Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(920px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
      animation: rise 600ms ease;
    }

    header {
      display: flex;
      flex-direction: column;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.4rem;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
      font-size: 1rem;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat .value.score {
      color: var(--accent);
    }

    .card {
      background: white;
      border-radius: 20px;
      padding: 20px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .checklist {
      display: grid;
      gap: 10px;
      margin-bottom: 16px;
    }

    .habit {
      display: flex;
      align-items: center;
      gap: 12px;
      padding: 10px 14px;
      border-radius: 14px;
      background: rgba(47, 72, 88, 0.04);
      cursor: pointer;
    }

    .habit.done {
      opacity: 0.6;
      cursor: default;
    }

    .habit input {
      width: 18px;
      height: 18px;
      accent-color: var(--accent);
    }

    .habit-name {
      flex: 1;
    }

    .points {
      font-weight: 600;
      color: var(--accent);
    }

    .tag {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: #2d7a4b;
    }

    .manage {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
      gap: 16px;
    }

    form.inline {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      margin-bottom: 10px;
    }

    input[type="text"],
    input[type="number"],
    select {
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 10px;
      padding: 9px 12px;
      font-size: 0.95rem;
      font-family: inherit;
      flex: 1;
      min-width: 0;
      background: white;
    }

    input[type="number"] {
      max-width: 90px;
      flex: none;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-size: 0.95rem;
      font-weight: 600;
      font-family: inherit;
      cursor: pointer;
      transition: transform 150ms ease, box-shadow 150ms ease;
      background: var(--accent-2);
      color: white;
    }

    button:active {
      transform: scale(0.98);
    }

    button.primary {
      background: var(--accent);
      box-shadow: 0 10px 24px rgba(255, 107, 74, 0.3);
      padding: 14px 22px;
      font-size: 1rem;
    }

    button.ghost {
      background: rgba(47, 72, 88, 0.12);
      color: var(--accent-2);
    }

    .rewards {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .reward {
      display: flex;
      align-items: center;
      gap: 12px;
      padding: 10px 14px;
      border-radius: 14px;
      background: rgba(47, 72, 88, 0.04);
    }

    .reward-name {
      flex: 1;
    }

    .cost {
      font-weight: 600;
      color: var(--accent-2);
    }

    .chart-area {
      display: grid;
      gap: 16px;
    }

    .chart-header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
    }

    .chart-header h2 {
      margin: 0;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
    }

    .tab {
      background: transparent;
      border: none;
      border-radius: 999px;
      padding: 8px 14px;
      font-size: 0.9rem;
      font-weight: 600;
      color: #6b645d;
      box-shadow: none;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    #chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    #chart text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-bar {
      fill: var(--accent);
      opacity: 0.85;
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-label {
      fill: #7a746d;
      font-size: 11px;
    }

    .calendar-header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      margin-bottom: 12px;
    }

    .calendar-header select {
      flex: none;
      width: 150px;
    }

    .calendar-day {
      display: flex;
      gap: 12px;
      padding: 8px 0;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
      font-size: 0.95rem;
    }

    .calendar-day .day-date {
      font-weight: 600;
      color: var(--accent-2);
      flex: none;
    }

    .calendar-day .day-habits {
      color: #5f5c57;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.9rem;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
      button.primary {
        width: 100%;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Habit &amp; Reward Tracker</h1>
      <p class="subtitle">Check habits off each day, collect points, spend them on rewards.</p>
    </header>

    <section class="panel">
      <div class="stat">
        <span class="label">Today</span>
        <span id="date" class="value">{{DATE}}</span>
      </div>
      <div class="stat">
        <span class="label">Total points</span>
        <span id="score" class="value score">{{SCORE}}</span>
      </div>
    </section>

    <section class="card">
      <h2>Today's habits</h2>
      <div class="checklist" id="checklist">
{{HABIT_CHECKLIST}}
      </div>
      <button class="primary" id="checkin-btn" type="button">Check in</button>
    </section>

    <section class="manage">
      <div class="card">
        <h2>Habits</h2>
        <form class="inline" method="post" action="/habits/add">
          <input type="text" name="name" placeholder="Habit name" required />
          <input type="number" name="points" min="1" value="1" required />
          <button type="submit">Add</button>
        </form>
        <form class="inline" method="post" action="/habits/remove">
          <select name="name">
{{HABIT_OPTIONS}}
          </select>
          <button class="ghost" type="submit">Delete</button>
        </form>
      </div>
      <div class="card">
        <h2>Rewards</h2>
        <form class="inline" method="post" action="/rewards/add">
          <input type="text" name="name" placeholder="Reward name" required />
          <input type="number" name="cost" min="1" value="10" required />
          <button type="submit">Add</button>
        </form>
        <form class="inline" method="post" action="/rewards/remove">
          <select name="name">
{{REWARD_OPTIONS}}
          </select>
          <button class="ghost" type="submit">Delete</button>
        </form>
      </div>
    </section>

    <section class="card">
      <h2>Redeem rewards</h2>
{{REWARD_LIST}}
    </section>

    <section class="chart-area card">
      <div class="chart-header">
        <div>
          <h2 id="chart-title">Completion counts</h2>
          <p id="chart-subtitle" class="subtitle">Days each habit was completed.</p>
        </div>
        <div class="tabs" role="tablist">
          <button class="tab active" type="button" data-tab="counts" role="tab" aria-selected="true">Counts</button>
          <button class="tab" type="button" data-tab="scores" role="tab" aria-selected="false">Daily score</button>
          <button class="tab" type="button" data-tab="rates" role="tab" aria-selected="false">Completion rate</button>
        </div>
      </div>
      <svg id="chart" viewBox="0 0 600 260" aria-label="History chart" role="img"></svg>
    </section>

    <section class="card">
      <div class="calendar-header">
        <h2>Calendar</h2>
        <select id="month"></select>
      </div>
      <div id="calendar"></div>
    </section>

    <div class="status" id="status"></div>
    <p class="hint">Completed habits lock until the next calendar day (server time). Deleting a habit keeps its history but stops counting it.</p>
  </main>

  <script>
    const scoreEl = document.getElementById('score');
    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('chart');
    const chartTitleEl = document.getElementById('chart-title');
    const chartSubtitleEl = document.getElementById('chart-subtitle');
    const monthEl = document.getElementById('month');
    const calendarEl = document.getElementById('calendar');
    const tabs = Array.from(document.querySelectorAll('.tab'));

    let statsData = null;
    let activeTab = 'counts';

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const escapeText = (value) =>
      value.replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;');

    const chartFrame = (min, max) => {
      const width = 600;
      const height = 260;
      const paddingX = 44;
      const paddingY = 34;
      const top = 24;
      if (min === max) {
        max += 1;
      }
      const range = max - min;
      const scaleY = (height - top - paddingY) / range;
      const y = (value) => height - paddingY - (value - min) * scaleY;

      const ticks = 4;
      let grid = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + (range * i) / ticks;
        const yPos = y(value);
        const label = Number.isInteger(value) ? value : value.toFixed(1);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${label}</text>`;
      }
      return { width, height, paddingX, paddingY, y, grid };
    };

    const renderBarChart = (points) => {
      if (!points.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }
      const max = Math.max(...points.map((point) => point.value));
      const frame = chartFrame(0, max);
      const innerWidth = frame.width - frame.paddingX * 2;
      const slot = innerWidth / points.length;
      const barWidth = Math.min(48, slot * 0.6);

      const bars = points
        .map((point, index) => {
          const x = frame.paddingX + slot * index + (slot - barWidth) / 2;
          const top = frame.y(point.value);
          const bottom = frame.y(0);
          return `<rect class="chart-bar" x="${x.toFixed(2)}" y="${top.toFixed(2)}" width="${barWidth.toFixed(2)}" height="${Math.max(0, bottom - top).toFixed(2)}" rx="4" />`;
        })
        .join('');

      const labels = points
        .map((point, index) => {
          const x = frame.paddingX + slot * index + slot / 2;
          const text = point.label.length > 8 ? point.label.slice(0, 7) + '…' : point.label;
          return `<text class="chart-label" x="${x}" y="${frame.height - frame.paddingY + 18}" text-anchor="middle">${escapeText(text)}</text>`;
        })
        .join('');

      chartEl.innerHTML = `${frame.grid}${bars}${labels}`;
    };

    const renderLineChart = (points) => {
      if (!points.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }
      const values = points.map((point) => point.value);
      const min = Math.min(Math.min(...values), 0);
      const max = Math.max(...values);
      const frame = chartFrame(min, max);
      const xStep = points.length > 1 ? (frame.width - frame.paddingX * 2) / (points.length - 1) : 0;
      const x = (index) => frame.paddingX + index * xStep;

      const path = points
        .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${frame.y(point.value).toFixed(2)}`)
        .join(' ');

      const circles = points
        .map((point, index) => `<circle class="chart-point" cx="${x(index)}" cy="${frame.y(point.value)}" r="4" />`)
        .join('');

      const labelEvery = Math.max(1, Math.ceil(points.length / 8));
      const labels = points
        .map((point, index) => {
          if (index % labelEvery !== 0) {
            return '';
          }
          return `<text class="chart-label" x="${x(index)}" y="${frame.height - frame.paddingY + 18}" text-anchor="middle">${point.label}</text>`;
        })
        .join('');

      chartEl.innerHTML = `${frame.grid}<path class="chart-line" d="${path}" />${circles}${labels}`;
    };

    const renderCounts = () => {
      chartTitleEl.textContent = 'Completion counts';
      chartSubtitleEl.textContent = 'Days each habit was completed.';
      renderBarChart(
        Object.entries(statsData.habit_totals).map(([name, count]) => ({ label: name, value: count }))
      );
    };

    const renderScores = () => {
      chartTitleEl.textContent = 'Daily score';
      chartSubtitleEl.textContent = 'Points earned per recorded day, at current habit values.';
      renderLineChart(
        Object.entries(statsData.daily_scores).map(([date, score]) => ({ label: date.slice(5), value: score }))
      );
    };

    const renderRates = () => {
      chartTitleEl.textContent = 'Completion rate';
      chartSubtitleEl.textContent = 'Share of recorded days each habit was completed (%).';
      renderBarChart(
        Object.entries(statsData.completion_rates).map(([name, rate]) => ({
          label: name,
          value: Math.round(rate * 10) / 10
        }))
      );
    };

    const renderActiveTab = () => {
      if (!statsData) {
        return;
      }
      if (activeTab === 'scores') {
        renderScores();
      } else if (activeTab === 'rates') {
        renderRates();
      } else {
        renderCounts();
      }
    };

    const setActiveTab = (tab) => {
      activeTab = tab;
      tabs.forEach((button) => {
        const isActive = button.dataset.tab === tab;
        button.classList.toggle('active', isActive);
        button.setAttribute('aria-selected', String(isActive));
      });
      renderActiveTab();
    };

    const renderCalendar = (days) => {
      calendarEl.innerHTML = '';
      const dates = Object.keys(days).sort().reverse();
      if (!dates.length) {
        const hint = document.createElement('p');
        hint.className = 'hint';
        hint.textContent = 'No recorded days in this month.';
        calendarEl.appendChild(hint);
        return;
      }
      dates.forEach((date) => {
        const row = document.createElement('div');
        row.className = 'calendar-day';
        const dateEl = document.createElement('span');
        dateEl.className = 'day-date';
        dateEl.textContent = date;
        const habitsEl = document.createElement('span');
        habitsEl.className = 'day-habits';
        habitsEl.textContent = days[date].length ? days[date].join(', ') : '(no completions)';
        row.appendChild(dateEl);
        row.appendChild(habitsEl);
        calendarEl.appendChild(row);
      });
    };

    const loadCalendar = async (month) => {
      if (!month) {
        renderCalendar({});
        return;
      }
      const res = await fetch(`/api/calendar/${encodeURIComponent(month)}`);
      if (!res.ok) {
        throw new Error('Unable to load calendar');
      }
      const data = await res.json();
      renderCalendar(data.days);
    };

    const loadStats = async () => {
      const res = await fetch('/api/stats');
      if (!res.ok) {
        throw new Error('Unable to load stats');
      }
      statsData = await res.json();
      renderActiveTab();

      const selected = monthEl.value;
      monthEl.innerHTML = '';
      statsData.months.forEach((month) => {
        const option = document.createElement('option');
        option.value = month;
        option.textContent = month;
        monthEl.appendChild(option);
      });
      if (selected && statsData.months.includes(selected)) {
        monthEl.value = selected;
      }
      await loadCalendar(monthEl.value);
    };

    const checkIn = async () => {
      const selected = Array.from(
        document.querySelectorAll('input[name="habit"]:checked')
      ).map((box) => box.value);

      setStatus('Saving...', '');
      const res = await fetch('/api/checkin', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ habits: selected })
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Check-in failed');
      }
      const data = await res.json();
      if (data.status === 'nothing_to_do') {
        setStatus('Everything is already checked in for today.', '');
        return;
      }
      scoreEl.textContent = data.score;
      data.completed.forEach((name) => {
        document.querySelectorAll('input[name="habit"]').forEach((box) => {
          if (box.value === name) {
            box.checked = true;
            box.disabled = true;
            box.closest('.habit').classList.add('done');
          }
        });
      });
      setStatus(`+${data.awarded} points — total ${data.score}.`, 'ok');
      loadStats().catch((err) => setStatus(err.message, 'error'));
    };

    const redeem = async (name) => {
      setStatus('Saving...', '');
      const res = await fetch('/api/redeem', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ name })
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Redeem failed');
      }
      const data = await res.json();
      if (data.status === 'insufficient_score') {
        setStatus(`Not enough points for "${name}" — it costs ${data.cost}, you have ${data.score}.`, 'error');
        return;
      }
      scoreEl.textContent = data.score;
      setStatus(`Redeemed "${name}" — ${data.score} points left.`, 'ok');
    };

    tabs.forEach((button) => {
      button.addEventListener('click', () => setActiveTab(button.dataset.tab));
    });

    monthEl.addEventListener('change', () => {
      loadCalendar(monthEl.value).catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('checkin-btn').addEventListener('click', () => {
      checkIn().catch((err) => setStatus(err.message, 'error'));
    });

    document.querySelectorAll('.redeem-form').forEach((form) => {
      form.addEventListener('submit', (event) => {
        event.preventDefault();
        redeem(form.querySelector('input[name="name"]').value).catch((err) => setStatus(err.message, 'error'));
      });
    });

    loadStats().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
